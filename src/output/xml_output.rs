use crate::output::traits::{ensure_parent, ExportFormat, Exporter, OutputError, OutputResult};
use crate::record::{FieldValue, ListingRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as an `<items>` document with one `<item>` per record
///
/// Every field becomes a child element; missing values are empty elements.
/// List fields are written as an empty element followed by a
/// `<{field}_list>` sibling holding one `<value>` per entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xml
    }

    fn export(&self, records: &[ListingRecord], path: &Path) -> OutputResult<()> {
        ensure_parent(path)?;
        let file = BufWriter::new(File::create(path)?);
        let mut writer = Writer::new_with_indent(file, b' ', 2);

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write(&mut writer, Event::Start(BytesStart::new("items")))?;

        for record in records {
            write(&mut writer, Event::Start(BytesStart::new("item")))?;
            for (name, value) in record.fields() {
                write_field(&mut writer, name, &value)?;
            }
            write(&mut writer, Event::End(BytesEnd::new("item")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("items")))?;

        let mut file = writer.into_inner();
        file.write_all(b"\n")?;
        file.flush()?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

fn write_field<W: Write>(writer: &mut Writer<W>, name: &str, value: &FieldValue<'_>) -> OutputResult<()> {
    match value {
        FieldValue::Missing => write(writer, Event::Empty(BytesStart::new(name))),
        FieldValue::Text(text) => write_text_element(writer, name, text),
        FieldValue::List(values) => {
            write(writer, Event::Empty(BytesStart::new(name)))?;

            let list_name = format!("{}_list", name);
            write(writer, Event::Start(BytesStart::new(list_name.as_str())))?;
            for value in values.iter() {
                write_text_element(writer, "value", value)?;
            }
            write(writer, Event::End(BytesEnd::new(list_name.as_str())))
        }
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> OutputResult<()> {
    if text.is_empty() {
        return write(writer, Event::Empty(BytesStart::new(name)));
    }

    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> OutputResult<()> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Xml(e.to_string()))
}

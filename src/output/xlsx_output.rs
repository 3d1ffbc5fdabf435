use crate::output::csv_output::LIST_SEPARATOR;
use crate::output::traits::{ensure_parent, ExportFormat, Exporter, OutputResult};
use crate::record::{FieldValue, ListingRecord, FIELD_NAMES};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Name of the single worksheet
pub const SHEET_NAME: &str = "eBay Data";

/// Fields written as numeric cells
const NUMERIC_FIELDS: [&str; 4] = ["price", "wasPrice", "available", "sold"];

/// Writes records as an Excel workbook with one sheet
///
/// The first row holds the field names; columns follow field order. List
/// fields are joined with [`LIST_SEPARATOR`] and missing values are left as
/// blank cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl Exporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn export(&self, records: &[ListingRecord], path: &Path) -> OutputResult<()> {
        ensure_parent(path)?;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        let header = Format::new().set_bold();
        for (col, name) in (0u16..).zip(FIELD_NAMES) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }

        for (row, record) in (1u32..).zip(records) {
            for (col, (name, value)) in (0u16..).zip(record.fields()) {
                write_cell(sheet, row, col, name, &value)?;
            }
        }

        workbook.save(path)?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    name: &str,
    value: &FieldValue<'_>,
) -> OutputResult<()> {
    let text = match value {
        FieldValue::Missing => return Ok(()),
        other => other.to_cell(LIST_SEPARATOR),
    };

    match text.parse::<f64>() {
        Ok(number) if NUMERIC_FIELDS.contains(&name) => {
            sheet.write_number(row, col, number)?;
        }
        _ => {
            sheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}

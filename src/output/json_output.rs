use crate::output::traits::{ensure_parent, ExportFormat, Exporter, OutputResult};
use crate::record::ListingRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as a JSON array of objects
///
/// Output is UTF-8 with non-ASCII text kept as is; missing fields are
/// `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl JsonExporter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(&self, records: &[ListingRecord], path: &Path) -> OutputResult<()> {
        ensure_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

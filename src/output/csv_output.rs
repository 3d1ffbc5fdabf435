use crate::output::traits::{ensure_parent, ExportFormat, Exporter, OutputResult};
use crate::record::{ListingRecord, FIELD_NAMES};
use std::path::Path;

/// Separator placed between the entries of list fields
pub const LIST_SEPARATOR: &str = " | ";

/// Writes records as CSV with a header row
///
/// List fields (`categories`, `whyToBuy`) are joined with
/// [`LIST_SEPARATOR`]; missing values are empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, records: &[ListingRecord], path: &Path) -> OutputResult<()> {
        ensure_parent(path)?;
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(FIELD_NAMES)?;
        for record in records {
            writer.write_record(
                record
                    .fields()
                    .iter()
                    .map(|(_, value)| value.to_cell(LIST_SEPARATOR)),
            )?;
        }
        writer.flush()?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

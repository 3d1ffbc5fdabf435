//! Output module for exporting records and reporting runs
//!
//! This module handles:
//! - Exporting collected records as JSON, CSV, XML and XLSX
//! - Output directory management and export file naming
//! - Printing the per-run summary

mod csv_output;
mod json_output;
pub mod stats;
mod traits;
mod xlsx_output;
mod xml_output;

pub use csv_output::{CsvExporter, LIST_SEPARATOR};
pub use json_output::JsonExporter;
pub use stats::{print_report, RunSummary};
pub use traits::{ExportFormat, Exporter, OutputError, OutputResult};
pub use xlsx_output::{XlsxExporter, SHEET_NAME};
pub use xml_output::XmlExporter;

use crate::record::ListingRecord;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// File name prefix of every export
pub const EXPORT_PREFIX: &str = "ebay_scrape";

/// Files written by one export pass
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(ExportFormat, OutputError)>,
}

/// Returns the exporter writing `format`
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(JsonExporter::default()),
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Xml => Box::new(XmlExporter),
        ExportFormat::Xlsx => Box::new(XlsxExporter),
    }
}

/// Export path without extension: `<dir>/ebay_scrape_<YYYYmmdd-HHMMSS>`
pub fn export_basename(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("{}_{}", EXPORT_PREFIX, now.format("%Y%m%d-%H%M%S")))
}

/// Creates the output directory if it does not exist
pub fn ensure_output_dir(dir: &Path) -> OutputResult<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Writes the JSON snapshot and every requested format
///
/// The pretty-printed JSON snapshot is always written first and also stands
/// in for a requested `json` format. A failing exporter is logged and
/// recorded; the remaining formats are still written.
pub fn export_all(
    records: &[ListingRecord],
    dir: &Path,
    formats: &[ExportFormat],
    now: DateTime<Local>,
) -> OutputResult<ExportOutcome> {
    ensure_output_dir(dir)?;
    let base = export_basename(dir, now);
    let mut outcome = ExportOutcome::default();

    let mut exporters: Vec<Box<dyn Exporter>> = vec![Box::new(JsonExporter::pretty())];
    let mut seen = vec![ExportFormat::Json];
    for format in formats {
        if !seen.contains(format) {
            seen.push(*format);
            exporters.push(exporter_for(*format));
        }
    }

    for exporter in exporters {
        let format = exporter.format();
        let path = base.with_extension(format.extension());

        match exporter.export(records, &path) {
            Ok(()) => {
                tracing::info!("Wrote {} records as {} to {}", records.len(), format, path.display());
                outcome.written.push(path);
            }
            Err(e) => {
                tracing::error!("Failed to export {}: {}", format, e);
                outcome.failed.push((format, e));
            }
        }
    }

    Ok(outcome)
}

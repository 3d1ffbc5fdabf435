//! Exporter trait and associated types
//!
//! This module defines the trait interface for record exporters and the
//! set of supported export formats.

use crate::record::ListingRecord;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write XML: {0}")]
    Xml(String),

    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination file format for collected records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Xlsx,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    /// Parses a format name, case-insensitively; `excel` is an alias of `xlsx`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(OutputError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

/// Trait for record exporters
///
/// Exporters write the whole record set to one file, creating parent
/// directories as needed. Field names and order are the same for every
/// format.
pub trait Exporter {
    /// Format written by this exporter
    fn format(&self) -> ExportFormat;

    /// Writes `records` to `path`, replacing any existing file
    fn export(&self, records: &[ListingRecord], path: &Path) -> OutputResult<()>;
}

/// Creates the parent directory of `path` if it does not exist
pub(crate) fn ensure_parent(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

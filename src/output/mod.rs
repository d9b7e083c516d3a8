//! Output module for exporting crawl results
//!
//! This module handles:
//! - Exporting the record set as CSV, JSON or a Markdown document
//! - Generating the Markdown crawl report
//!
//! Every exporter only reads the record set.

mod csv_export;
mod document;
mod json_export;
mod report;

pub use csv_export::CsvExporter;
pub use document::DocumentExporter;
pub use json_export::JsonExporter;
pub use report::{format_report, write_report, RunInfo};

use crate::state::RecordSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Flattens a record set into one export format
pub trait RecordExporter {
    /// Short format name used in log messages
    fn name(&self) -> &'static str;

    /// Writes `records` in crawl order to `writer`
    fn export(&self, records: &RecordSet, writer: &mut dyn Write) -> OutputResult<()>;

    /// Creates (or truncates) `path` and exports into it
    fn export_to_path(&self, records: &RecordSet, path: &Path) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.export(records, &mut writer)?;
        writer.flush()?;

        tracing::info!("Wrote {} export of {} records to {}", self.name(), records.len(), path.display());
        Ok(())
    }

    /// Exports into an in-memory string
    fn export_to_string(&self, records: &RecordSet) -> OutputResult<String> {
        let mut buffer = Vec::new();
        self.export(records, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

//! JSON export: a structural mirror of the record set

use crate::output::{OutputResult, RecordExporter};
use crate::state::RecordSet;
use std::io::Write;

/// Pretty-printed object keyed by URL, in crawl order
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl RecordExporter for JsonExporter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn export(&self, records: &RecordSet, writer: &mut dyn Write) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

//! Tabular export: one row per page

use crate::output::{OutputResult, RecordExporter};
use crate::state::RecordSet;
use std::io::Write;

const HEADER: [&str; 7] = ["URL", "Title", "MetaDesc", "Status", "Depth", "Hash", "LinksCount"];

/// Writes `URL,Title,MetaDesc,Status,Depth,Hash,LinksCount` rows
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl RecordExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn export(&self, records: &RecordSet, writer: &mut dyn Write) -> OutputResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(HEADER)?;

        for record in records {
            let depth = record.depth.to_string();
            let links_count = record.outbound_links.len().to_string();
            csv_writer.write_record([
                record.url.as_str(),
                record.title.as_str(),
                record.meta_description.as_str(),
                record.status.as_str(),
                depth.as_str(),
                record.content_hash.as_str(),
                links_count.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

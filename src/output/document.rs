//! Document export: one Markdown section per page
//!
//! Page headings become level 1; headings found on the page move one level
//! down (capped at 6) so they nest under it.

use crate::output::{OutputResult, RecordExporter};
use crate::state::{ContentBlock, PageRecord, RecordSet};
use std::io::Write;

/// Renders every page's blocks in order as Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl RecordExporter for DocumentExporter {
    fn name(&self) -> &'static str {
        "document"
    }

    fn export(&self, records: &RecordSet, writer: &mut dyn Write) -> OutputResult<()> {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                // Page break
                writeln!(writer, "\n***\n")?;
            }
            write_page(record, writer)?;
        }
        Ok(())
    }
}

fn write_page(record: &PageRecord, writer: &mut dyn Write) -> OutputResult<()> {
    let heading = if record.title.is_empty() {
        &record.url
    } else {
        &record.title
    };

    writeln!(writer, "# {}\n", heading)?;
    writeln!(writer, "URL: {}\n", record.url)?;
    writeln!(writer, "Meta Description: {}\n", record.meta_description)?;
    writeln!(writer, "Status: {}\n", record.status)?;
    writeln!(writer, "Depth: {}\n", record.depth)?;
    writeln!(writer, "---\n")?;

    for block in &record.blocks {
        write_block(block, writer)?;
    }
    Ok(())
}

fn write_block(block: &ContentBlock, writer: &mut dyn Write) -> OutputResult<()> {
    match block {
        ContentBlock::Heading { level, text } => {
            let level = (*level as usize + 1).min(6);
            writeln!(writer, "{} {}\n", "#".repeat(level), text)?;
        }
        ContentBlock::Paragraph { text } => writeln!(writer, "{}\n", text)?,
        ContentBlock::ListItem { text } => writeln!(writer, "- {}\n", text)?,
        ContentBlock::Table { rows } => {
            writeln!(writer, "Table Data:\n")?;
            for row in rows {
                writeln!(writer, "{}\n", row.join(" | "))?;
            }
        }
        ContentBlock::Image { src, alt } => writeln!(writer, "[Image] src={} alt='{}'\n", src, alt)?,
    }
    Ok(())
}

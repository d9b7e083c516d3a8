//! Crawl result data model
//!
//! This module defines the per-page record, its content blocks, the terminal
//! page statuses and the ordered record set a crawl produces.

mod page_state;
mod record;

pub use page_state::PageStatus;
pub use record::{content_hash, ContentBlock, PageRecord, RecordSet};

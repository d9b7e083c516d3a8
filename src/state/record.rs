//! Per-page records and the record set produced by a crawl

use crate::state::PageStatus;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// One structural piece of page content, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// `<h1>` .. `<h6>`
    Heading { level: u8, text: String },

    /// `<p>`
    Paragraph { text: String },

    /// `<li>` from either list kind; nesting is flattened
    ListItem { text: String },

    /// `<table>` as rows of cell text
    Table { rows: Vec<Vec<String>> },

    /// `<img>` with a non-empty `src`
    Image { src: String, alt: String },
}

impl ContentBlock {
    /// Text that contributes to the page's content hash, if any
    ///
    /// Only headings and paragraphs count.
    pub fn hashed_text(&self) -> Option<&str> {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } => Some(text),
            _ => None,
        }
    }
}

/// Computes the duplicate-detection fingerprint of a page
///
/// SHA-256 (hex) over heading and paragraph text joined by newlines, in block
/// order. Returns an empty string when the page has no such text.
pub fn content_hash(blocks: &[ContentBlock]) -> String {
    let parts: Vec<&str> = blocks.iter().filter_map(ContentBlock::hashed_text).collect();
    if parts.is_empty() {
        return String::new();
    }

    let mut hasher = Sha256::new();
    hasher.update(parts.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

/// Everything recorded about one visited URL
///
/// Created once when the URL is dequeued and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Absolute URL, the record's key
    pub url: String,

    pub title: String,

    pub meta_description: String,

    /// Content blocks in document order
    pub blocks: Vec<ContentBlock>,

    /// Every anchor target on the page, resolved, duplicates kept
    pub outbound_links: Vec<String>,

    pub status: PageStatus,

    /// See [`content_hash`]; empty for pages that were not fetched
    pub content_hash: String,

    /// BFS distance from the seed
    pub depth: u32,

    /// Why the fetch failed, for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl PageRecord {
    /// Record for a page whose markup was fetched and extracted
    pub fn ok(
        url: impl Into<String>,
        depth: u32,
        title: String,
        meta_description: String,
        blocks: Vec<ContentBlock>,
        outbound_links: Vec<String>,
    ) -> Self {
        let content_hash = content_hash(&blocks);
        Self {
            url: url.into(),
            title,
            meta_description,
            blocks,
            outbound_links,
            status: PageStatus::Ok,
            content_hash,
            depth,
            fetch_error: None,
        }
    }

    /// Record for a page that could not be fetched
    pub fn fetch_error(url: impl Into<String>, depth: u32, cause: impl Into<String>) -> Self {
        Self {
            fetch_error: Some(cause.into()),
            ..Self::empty(url, depth, PageStatus::FetchError)
        }
    }

    /// Record for a page that robots.txt forbids
    pub fn robots_disallowed(url: impl Into<String>, depth: u32) -> Self {
        Self::empty(url, depth, PageStatus::RobotsDisallowed)
    }

    fn empty(url: impl Into<String>, depth: u32, status: PageStatus) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            meta_description: String::new(),
            blocks: Vec::new(),
            outbound_links: Vec::new(),
            status,
            content_hash: String::new(),
            depth,
            fetch_error: None,
        }
    }
}

/// Mapping from URL to [`PageRecord`], iterated in crawl order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<PageRecord>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    /// Creates an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record
    ///
    /// # Returns
    ///
    /// * `true` - The record was stored
    /// * `false` - A record with the same URL already exists; nothing changed
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.index.contains_key(&record.url) {
            return false;
        }
        self.index.insert(record.url.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in the order they were created
    pub fn iter(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.iter()
    }

    /// URLs in crawl order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }

    /// Number of records with the given status
    pub fn count_by_status(&self, status: PageStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<PageRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = PageRecord>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

// Serialized as a JSON object keyed by URL, preserving crawl order
impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.url, record)?;
        }
        map.end()
    }
}

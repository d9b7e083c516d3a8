//! HTML content extraction
//!
//! This module turns raw markup into:
//! - Content blocks (headings, paragraphs, list items, tables, images) in document order
//! - Page title and meta description
//! - Outbound links, resolved against the page URL
//!
//! Extraction is best-effort: malformed markup yields whatever parses cleanly
//! and never fails the page.

use crate::state::ContentBlock;
use crate::url::resolve_href;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// List items count only inside `ul` or `ol`
const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, ul li, ol li, table, img";

/// Structural content of one page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub blocks: Vec<ContentBlock>,
    pub title: String,
    pub meta_description: String,
}

/// Everything read from a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPage {
    pub content: Extraction,

    /// Absolute URLs of every `<a href>`, in document order, duplicates kept
    pub links: Vec<String>,
}

/// Extracts blocks, title and meta description from markup
///
/// A pure function of `markup`: the same input always yields the same output.
///
/// # Example
///
/// ```
/// use crawlscope::crawler::extract;
/// use crawlscope::ContentBlock;
///
/// let page = extract("<title> Hi </title><h2>Intro</h2><p></p>");
/// assert_eq!(page.title, "Hi");
/// assert_eq!(page.blocks, vec![ContentBlock::Heading { level: 2, text: "Intro".to_string() }]);
/// ```
pub fn extract(markup: &str) -> Extraction {
    extract_from(&Html::parse_document(markup))
}

/// Extracts every anchor target in `markup`, resolved against `page_url`
pub fn extract_links(markup: &str, page_url: &Url) -> Vec<String> {
    links_from(&Html::parse_document(markup), page_url)
}

/// Parses markup once and extracts both content and links
pub fn parse_page(markup: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(markup);
    ParsedPage {
        content: extract_from(&document),
        links: links_from(&document, page_url),
    }
}

fn extract_from(document: &Html) -> Extraction {
    Extraction {
        blocks: extract_blocks(document),
        title: extract_title(document),
        meta_description: extract_meta_description(document),
    }
}

/// Walks all block-level elements once, in document order
fn extract_blocks(document: &Html) -> Vec<ContentBlock> {
    let Ok(selector) = Selector::parse(BLOCK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| match element.value().name() {
            "p" => non_empty(element).map(|text| ContentBlock::Paragraph { text }),
            "li" => non_empty(element).map(|text| ContentBlock::ListItem { text }),
            "table" => table_block(element),
            "img" => image_block(element),
            name => {
                let level = heading_level(name)?;
                non_empty(element).map(|text| ContentBlock::Heading { level, text })
            }
        })
        .collect()
}

fn heading_level(tag: &str) -> Option<u8> {
    let level: u8 = tag.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn table_block(table: ElementRef) -> Option<ContentBlock> {
    let row_selector = Selector::parse("tr").ok()?;
    let cell_selector = Selector::parse("th, td").ok()?;

    let rows: Vec<Vec<String>> = table
        .select(&row_selector)
        .map(|row| row.select(&cell_selector).map(element_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(ContentBlock::Table { rows })
    }
}

fn image_block(img: ElementRef) -> Option<ContentBlock> {
    let src = img.value().attr("src")?.trim();
    if src.is_empty() {
        return None;
    }
    Some(ContentBlock::Image {
        src: src.to_string(),
        alt: img.value().attr("alt").unwrap_or_default().trim().to_string(),
    })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// First `<meta name="description">`, name matched case-insensitively
fn extract_meta_description(document: &Html) -> String {
    let Ok(meta_selector) = Selector::parse("meta[name][content]") else {
        return String::new();
    };

    document
        .select(&meta_selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn links_from(document: &Html, page_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(page_url, href))
        .map(String::from)
        .collect()
}

/// All descendant text with whitespace runs collapsed to single spaces
fn element_text(element: ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(element: ElementRef) -> Option<String> {
    let text = element_text(element);
    (!text.is_empty()).then_some(text)
}

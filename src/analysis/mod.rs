//! Post-crawl analysis
//!
//! Read-only passes over a finished record set:
//! - Duplicate content clusters (by content hash)
//! - Broken links within the crawled set
//! - Pages missing a title or meta description

use crate::state::RecordSet;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Pages with missing SEO metadata, in crawl order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoIssues {
    pub missing_titles: Vec<String>,
    pub missing_meta_descriptions: Vec<String>,
}

impl SeoIssues {
    pub fn is_empty(&self) -> bool {
        self.missing_titles.is_empty() && self.missing_meta_descriptions.is_empty()
    }
}

/// Everything the analyzer reports about one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Groups of two or more URLs sharing a content hash
    pub duplicate_clusters: Vec<Vec<String>>,

    /// `(source, target)` pairs where the target failed to fetch
    pub broken_links: Vec<(String, String)>,

    pub seo_issues: SeoIssues,
}

/// Runs every analysis pass
pub fn analyze(records: &RecordSet) -> CrawlReport {
    CrawlReport {
        duplicate_clusters: duplicate_clusters(records),
        broken_links: broken_links(records),
        seo_issues: seo_issues(records),
    }
}

/// Groups URLs by non-empty content hash, keeping groups of two or more
///
/// Clusters are ordered by their first member's crawl position, and members
/// within a cluster by crawl order.
pub fn duplicate_clusters(records: &RecordSet) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut by_hash: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| !r.content_hash.is_empty()) {
        match by_hash.get(record.content_hash.as_str()) {
            Some(&i) => groups[i].push(record.url.clone()),
            None => {
                by_hash.insert(&record.content_hash, groups.len());
                groups.push(vec![record.url.clone()]);
            }
        }
    }

    groups.retain(|group| group.len() >= 2);
    groups
}

/// Finds links from ok pages to crawled pages whose fetch failed
///
/// Targets outside the record set are never reported. Each pair is reported
/// once even if the source links to the target repeatedly.
pub fn broken_links(records: &RecordSet) -> Vec<(String, String)> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut broken = Vec::new();

    for source in records.iter().filter(|r| r.status.is_ok()) {
        for link in &source.outbound_links {
            let is_broken = records
                .get(link)
                .is_some_and(|target| target.status.is_fetch_error());

            if is_broken && seen.insert((source.url.as_str(), link.as_str())) {
                broken.push((source.url.clone(), link.clone()));
            }
        }
    }

    broken
}

/// Lists ok pages with an empty title and, separately, an empty meta description
pub fn seo_issues(records: &RecordSet) -> SeoIssues {
    let mut issues = SeoIssues::default();

    for record in records.iter().filter(|r| r.status.is_ok()) {
        if record.title.is_empty() {
            issues.missing_titles.push(record.url.clone());
        }
        if record.meta_description.is_empty() {
            issues.missing_meta_descriptions.push(record.url.clone());
        }
    }

    issues
}

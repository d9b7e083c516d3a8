//! Markdown crawl report
//!
//! This module renders the run metadata, status and depth breakdowns, and the
//! analyzer's findings as a human-readable Markdown document.

use crate::analysis::CrawlReport;
use crate::output::OutputResult;
use crate::state::{PageStatus, RecordSet};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata about one crawl run
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub seed_url: String,
    pub fetch_mode: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
}

impl RunInfo {
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Writes the report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the file
pub fn write_report(
    run: &RunInfo,
    records: &RecordSet,
    report: &CrawlReport,
    output_path: &Path,
) -> OutputResult<()> {
    std::fs::write(output_path, format_report(run, records, report))?;
    tracing::info!("Wrote crawl report to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as Markdown
pub fn format_report(run: &RunInfo, records: &RecordSet, report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Crawlscope Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed URL**: {}\n", run.seed_url));
    md.push_str(&format!("- **Fetch Mode**: {}\n", run.fetch_mode));
    md.push_str(&format!("- **Started**: {}\n", run.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", run.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {:.1} seconds\n", run.duration_seconds()));
    if let Some(hash) = &run.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Status breakdown
    md.push_str("## Pages\n\n");
    md.push_str(&format!("- **Total Pages**: {}\n", records.len()));
    md.push_str(&format!(
        "- **Total Links**: {}\n\n",
        records.iter().map(|r| r.outbound_links.len()).sum::<usize>()
    ));
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    for status in PageStatus::all() {
        md.push_str(&format!("| {} | {} |\n", status, records.count_by_status(status)));
    }
    md.push('\n');

    let mut depths: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *depths.entry(record.depth).or_default() += 1;
    }
    if !depths.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &depths {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    // SEO
    md.push_str("## SEO Issues\n\n");
    if report.seo_issues.is_empty() {
        md.push_str("No missing titles or meta descriptions.\n\n");
    } else {
        push_url_list(&mut md, "Missing Titles", &report.seo_issues.missing_titles);
        push_url_list(
            &mut md,
            "Missing Meta Descriptions",
            &report.seo_issues.missing_meta_descriptions,
        );
    }

    md.push_str("## Duplicate Content\n\n");
    if report.duplicate_clusters.is_empty() {
        md.push_str("No duplicate pages found.\n\n");
    } else {
        for (i, cluster) in report.duplicate_clusters.iter().enumerate() {
            md.push_str(&format!("### Cluster {} ({} pages)\n\n", i + 1, cluster.len()));
            for url in cluster {
                md.push_str(&format!("- {}\n", url));
            }
            md.push('\n');
        }
    }

    md.push_str("## Broken Links\n\n");
    if report.broken_links.is_empty() {
        md.push_str("No broken internal links found.\n\n");
    } else {
        md.push_str("| Source | Target |\n");
        md.push_str("|--------|--------|\n");
        for (source, target) in &report.broken_links {
            md.push_str(&format!("| {} | {} |\n", source, target));
        }
        md.push('\n');
    }

    md
}

fn push_url_list(md: &mut String, title: &str, urls: &[String]) {
    md.push_str(&format!("### {} ({})\n\n", title, urls.len()));
    if urls.is_empty() {
        md.push_str("None.\n\n");
        return;
    }
    for url in urls {
        md.push_str(&format!("- {}\n", url));
    }
    md.push('\n');
}

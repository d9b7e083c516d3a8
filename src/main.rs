//! Crawlscope main entry point
//!
//! This is the command-line interface for the Crawlscope site crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use crawlscope::analysis::{analyze, CrawlReport};
use crawlscope::config::{load_config_with_hash, Config, FetchMode};
use crawlscope::crawler::run_crawl;
use crawlscope::output::{
    format_report, write_report, CsvExporter, DocumentExporter, JsonExporter, RecordExporter, RunInfo,
};
use crawlscope::url::parse_seed;
use crawlscope::RecordSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Crawlscope: a single-site crawler and content auditor
///
/// Crawlscope crawls one website breadth-first, extracts the structure of
/// every page, and reports duplicate content, broken internal links and
/// missing SEO metadata.
#[derive(Parser, Debug)]
#[command(name = "crawlscope")]
#[command(version)]
#[command(about = "A single-site crawler and content auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Do not print the crawl report to stdout
    #[arg(long)]
    no_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(&config, config_hash, !cli.no_summary && !cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawlscope=info,warn"),
            1 => EnvFilter::new("crawlscope=debug,info"),
            2 => EnvFilter::new("crawlscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let seed = parse_seed(config.crawl.seed_url.trim())?;

    println!("=== Crawlscope Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", seed);
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Max depth: {}", config.crawl.max_depth);
    match config.crawl.delay_seconds {
        Some(delay) => println!("  Delay: {}s", delay),
        None if config.crawl.respect_robots => println!("  Delay: robots.txt Crawl-delay, else 1s"),
        None => println!("  Delay: 1s"),
    }
    println!("  Respect robots.txt: {}", config.crawl.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nFetch:");
    println!("  Mode: {}", config.fetch.mode.as_str());
    println!("  Timeout: {}s", config.fetch.timeout_seconds);
    match config.fetch.mode {
        FetchMode::Anonymous => {}
        FetchMode::SessionAuth => {
            if let Some(session) = &config.fetch.session {
                println!("  Login URL: {}", session.login_url);
                println!("  Username: {}", session.username);
            }
        }
        FetchMode::Browser => {
            let browser = config.fetch.browser.clone().unwrap_or_default();
            println!("  WebDriver: {}", browser.webdriver_url);
            println!("  Headless: {}", browser.headless);
            if let Some(login) = &browser.login {
                println!("  Scripted login at: {}", login.login_url);
            }
        }
    }

    println!("\nOutput:");
    for (name, path) in output_paths(config) {
        println!("  {}: {}", name, path.unwrap_or("(disabled)"));
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", seed);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: String, print_summary: bool) -> anyhow::Result<()> {
    let started_at = Utc::now();
    let records = run_crawl(config).await.context("Crawl failed")?;
    let finished_at = Utc::now();

    let report = analyze(&records);
    tracing::info!(
        "Analysis: {} duplicate clusters, {} broken links, {} pages missing titles",
        report.duplicate_clusters.len(),
        report.broken_links.len(),
        report.seo_issues.missing_titles.len()
    );

    let run = RunInfo {
        seed_url: config.crawl.seed_url.clone(),
        fetch_mode: config.fetch.mode.as_str().to_string(),
        started_at,
        finished_at,
        config_hash: Some(config_hash),
    };

    write_outputs(config, &run, &records, &report)?;

    if print_summary {
        println!("{}", format_report(&run, &records, &report));
    }

    Ok(())
}

/// Writes every export whose path is configured
fn write_outputs(config: &Config, run: &RunInfo, records: &RecordSet, report: &CrawlReport) -> anyhow::Result<()> {
    let exporters: [(Option<&String>, &dyn RecordExporter); 3] = [
        (config.output.csv_path.as_ref(), &CsvExporter),
        (config.output.json_path.as_ref(), &JsonExporter),
        (config.output.document_path.as_ref(), &DocumentExporter),
    ];

    for (path, exporter) in exporters {
        if let Some(path) = path {
            exporter
                .export_to_path(records, Path::new(path))
                .with_context(|| format!("Failed to write {} export to {}", exporter.name(), path))?;
        }
    }

    if let Some(path) = &config.output.report_path {
        write_report(run, records, report, Path::new(path))
            .with_context(|| format!("Failed to write report to {}", path))?;
    }

    Ok(())
}

fn output_paths(config: &Config) -> [(&'static str, Option<&str>); 4] {
    [
        ("CSV", config.output.csv_path.as_deref()),
        ("JSON", config.output.json_path.as_deref()),
        ("Document", config.output.document_path.as_deref()),
        ("Report", config.output.report_path.as_deref()),
    ]
}

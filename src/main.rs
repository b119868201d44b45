//! Finishline main entry point
//!
//! This is the command-line interface for the finishline reconciliation
//! tooling: config validation (dry run) and offline count reconciliation
//! over a previously collected record file. Crawls themselves are driven
//! through the library with a per-site adapter.

use anyhow::Context;
use clap::Parser;
use finishline::config::load_config_with_hash;
use finishline::reconcile::{
    load_authority_counts, reconcile_against_authority, reconcile_by_heuristic, render_table,
    write_csv,
};
use finishline::record::load_records;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Finishline: race-result crawl-and-reconcile engine
///
/// Finishline collects race results from timing-provider sites through
/// per-site adapters, normalizes them into one canonical record shape, and
/// reconciles the collected counts against what each site claims to hold.
#[derive(Parser, Debug)]
#[command(name = "finishline")]
#[command(version = "1.0.0")]
#[command(about = "Race-result crawl-and-reconcile engine", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["records", "authority"])]
    dry_run: bool,

    /// Record file to reconcile (defaults to the configured records path)
    #[arg(long, value_name = "FILE")]
    records: Option<PathBuf>,

    /// Authority counts JSON; without it the rank-denominator heuristic is used
    #[arg(long, value_name = "FILE")]
    authority: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_reconcile(&config, cli.records.as_deref(), cli.authority.as_deref())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("finishline=info,warn"),
            1 => EnvFilter::new("finishline=debug,info"),
            2 => EnvFilter::new("finishline=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &finishline::config::Config) {
    println!("=== Finishline Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Page limit: {}", config.crawler.page_limit);
    println!(
        "  Max transient retries: {}",
        config.crawler.max_transient_retries
    );
    println!("  Max empty retries: {}", config.crawler.max_empty_retries);
    println!(
        "  Rate-limit cool-down: {}ms",
        config.crawler.rate_limit_cooldown_ms
    );
    println!(
        "  Retry status codes: {:?}",
        config.crawler.retry_status_codes
    );

    println!("\nSource:");
    println!("  Id: {}", config.source.id);
    println!("  Base URL: {}", config.source.base_url);
    if let Some(name) = &config.source.event_name {
        println!("  Event name: {}", name);
    }
    if let Some(year) = &config.source.year {
        println!("  Year: {}", year);
    }
    if let (Some(start), Some(end)) = (config.source.start_id, config.source.end_id) {
        println!("  Identifier range: {}..{} (end exclusive)", start, end);
    }
    if let (Some(start), Some(end)) = (config.source.proxy_start, config.source.proxy_end) {
        println!("  Proxy pool: {}..{} (end exclusive)", start, end);
    }

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
}

/// Handles reconciliation over a collected record file
fn handle_reconcile(
    config: &finishline::config::Config,
    records_path: Option<&Path>,
    authority_path: Option<&Path>,
) -> anyhow::Result<()> {
    let records_path =
        records_path.unwrap_or_else(|| Path::new(config.output.records_path.as_str()));

    tracing::info!("Loading records from: {}", records_path.display());
    let records = load_records(records_path)
        .with_context(|| format!("failed to load records from {}", records_path.display()))?;
    tracing::info!("Loaded {} records", records.len());

    let report = match authority_path {
        Some(path) => {
            tracing::info!("Reconciling against authority counts: {}", path.display());
            let authority = load_authority_counts(path)
                .with_context(|| format!("failed to load authority counts {}", path.display()))?;
            reconcile_against_authority(&records, &authority)
        }
        None => {
            tracing::info!("No authority counts given; using rank-denominator heuristic");
            reconcile_by_heuristic(&records)
        }
    };

    print!("{}", render_table(&report));

    let report_path = Path::new(config.output.report_path.as_str());
    write_csv(&report, report_path)
        .with_context(|| format!("failed to write {}", report_path.display()))?;
    println!("✓ Report exported to: {}", config.output.report_path);

    Ok(())
}

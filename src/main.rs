//! Site-Ingest main entry point
//!
//! This is the command-line interface for crawling an origin into the
//! retrieval store.

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use site_ingest::config::{load_config_with_hash, Config};
use site_ingest::crawler::Crawler;
use site_ingest::ingest::{ArtifactCache, CacheOutcome, OpenAiIngestionClient};
use site_ingest::lookup::{AccountLookup, XrpScanLookup};
use site_ingest::pipeline::{crawl_and_aggregate, Pipeline, PipelineReport};
use site_ingest::state::{ProgressSink, TracingProgress};
use site_ingest::storage::open_storage;
use site_ingest::url::{normalize_origin, origin_from_domain};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Ingest: crawl one origin into a single retrieval artifact
///
/// Crawls the pages an origin's home page links to, flattens them into one
/// text file, and uploads it once per origin.
#[derive(Parser, Debug)]
#[command(name = "site-ingest")]
#[command(version)]
#[command(about = "Crawl one origin into a single retrieval artifact", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Wallet address whose registered domain should be crawled
    #[arg(long, conflicts_with_all = ["domain", "url"])]
    address: Option<String>,

    /// Bare domain to crawl over https (e.g. example.com)
    #[arg(long, conflicts_with_all = ["address", "url"])]
    domain: Option<String>,

    /// Origin URL to crawl
    #[arg(long, conflicts_with_all = ["address", "domain"])]
    url: Option<String>,

    /// Crawl and aggregate only; nothing is written or uploaded
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the artifact recency index and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// What to crawl
enum Target {
    Address(String),
    Origin(String),
}

impl Cli {
    fn target(&self) -> anyhow::Result<Target> {
        if let Some(address) = &self.address {
            return Ok(Target::Address(address.clone()));
        }
        if let Some(domain) = &self.domain {
            return Ok(Target::Origin(origin_from_domain(domain)?));
        }
        if let Some(url) = &self.url {
            return Ok(Target::Origin(normalize_origin(url)?));
        }
        bail!("one of --address, --domain or --url is required")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        return handle_stats(&config);
    }

    let target = cli.target()?;
    if cli.dry_run {
        handle_dry_run(&config, target, cli.quiet).await
    } else {
        handle_ingest(&config, target, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_ingest=info,warn"),
            1 => EnvFilter::new("site_ingest=debug,info"),
            2 => EnvFilter::new("site_ingest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Progress sink drawing an indicatif bar, or logging when quiet
struct CliProgress {
    bar: Option<ProgressBar>,
}

impl CliProgress {
    const SCALE: u64 = 1000;

    fn new(quiet: bool) -> Self {
        if quiet {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(Self::SCALE);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}% {msg}") {
            bar.set_style(style);
        }
        Self { bar: Some(bar) }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for CliProgress {
    fn report(&mut self, fraction: f64, label: &str) {
        match &self.bar {
            Some(bar) => {
                bar.set_position((fraction * Self::SCALE as f64).round() as u64);
                bar.set_message(label.to_string());
            }
            None => TracingProgress.report(fraction, label),
        }
    }
}

async fn resolve_origin(config: &Config, target: Target) -> anyhow::Result<String> {
    match target {
        Target::Origin(origin) => Ok(origin),
        Target::Address(address) => {
            let lookup = XrpScanLookup::new(&config.lookup)?;
            let profile = lookup.account(&address).await?;
            profile.require_complete()?;
            Ok(profile.origin()?)
        }
    }
}

/// Handles the --dry-run mode: crawls and aggregates, writes nothing
async fn handle_dry_run(config: &Config, target: Target, quiet: bool) -> anyhow::Result<()> {
    let origin = resolve_origin(config, target).await?;
    let crawler = Crawler::new(&config.fetcher, config.crawl.clone())?;

    let mut progress = CliProgress::new(quiet);
    let (crawl, text) = crawl_and_aggregate(&crawler, &origin, &mut progress).await?;
    progress.finish();

    println!("=== Site-Ingest Dry Run ===\n");
    println!("Origin:      {}", crawl.origin);
    println!("Home links:  {}", crawl.home_links);
    println!("Pages:       {}", crawl.pages.len());
    println!("Failures:    {}", crawl.failures.len());
    for failure in &crawl.failures {
        println!("  - {}", failure);
    }
    println!("Termination: {}", crawl.termination);
    println!("Aggregated:  {} bytes", text.len());
    println!("Elapsed:     {:.1}s", crawl.elapsed.as_secs_f64());

    Ok(())
}

/// Handles the main ingest operation
async fn handle_ingest(config: &Config, target: Target, quiet: bool) -> anyhow::Result<()> {
    let ingestion = config.ingestion()?;
    let client = OpenAiIngestionClient::from_config(ingestion)?;
    let crawler = Crawler::new(&config.fetcher, config.crawl.clone())?;

    let mut store = open_storage(Path::new(&config.storage.database_path))
        .with_context(|| format!("failed to open {}", config.storage.database_path))?;
    let cache = ArtifactCache::new(
        &mut store,
        &config.storage.staging_dir,
        config.storage.recency_key.as_str(),
    );
    let mut pipeline = Pipeline::new(crawler, cache, client);
    let mut progress = CliProgress::new(quiet);

    let report = match target {
        Target::Origin(origin) => pipeline.ingest_origin(&origin, &mut progress).await,
        Target::Address(address) => {
            let lookup = XrpScanLookup::new(&config.lookup)?;
            pipeline
                .ingest_account(&lookup, &address, &mut progress)
                .await
                .map(|account| {
                    println!(
                        "Account {}: verified={}, handle={}, balance={}, initial balance={}",
                        account.profile.address,
                        if account.profile.verified { "yes" } else { "no" },
                        account.profile.social_handle.as_deref().unwrap_or("-"),
                        display_amount(account.profile.balance),
                        display_amount(account.profile.initial_balance),
                    );
                    account.ingest
                })
        }
    };
    progress.finish();

    let report = report.context("ingestion failed")?;
    print_report(&report);
    Ok(())
}

fn display_amount(amount: Option<f64>) -> String {
    amount.map_or_else(|| "-".to_string(), |a| a.to_string())
}

fn print_report(report: &PipelineReport) {
    println!("Origin:     {}", report.crawl.origin);
    println!("Company:    {}", report.company);
    println!(
        "Pages:      {} fetched, {} failed ({})",
        report.crawl.pages.len(),
        report.crawl.failures.len(),
        report.crawl.termination
    );
    println!("Aggregated: {} bytes", report.aggregated_bytes);
    println!("Artifact:   {}", report.artifact.artifact_id);
    match &report.artifact.outcome {
        CacheOutcome::Hit { .. } => println!("Status:     already ingested, recency refreshed"),
        CacheOutcome::Ingested {
            registration_id,
            staging_path,
            ..
        } => {
            println!("Status:     uploaded (registration {})", registration_id);
            println!("Staged at:  {}", staging_path.display());
        }
    }
}

/// Handles the --stats mode: shows the recency index
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let mut store = open_storage(Path::new(&config.storage.database_path))?;
    let cache = ArtifactCache::new(
        &mut store,
        &config.storage.staging_dir,
        config.storage.recency_key.as_str(),
    );

    let recent = cache.recent_artifacts()?;
    println!("Artifacts ({}):", recent.len());
    for entry in recent {
        let touched = chrono::DateTime::from_timestamp(entry.touched_at, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| entry.touched_at.to_string());
        println!(
            "  {}  {}  {}",
            touched,
            entry.artifact_id,
            entry.origin.as_deref().unwrap_or("(no origin)")
        );
    }

    Ok(())
}

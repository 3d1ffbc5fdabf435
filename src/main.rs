//! ebay-scraper main entry point
//!
//! This is the command-line interface for the eBay listing scraper.

use anyhow::Context;
use clap::Parser;
use ebay_scraper::config::{
    load_seed_input, load_settings_with_hash, validate_proxy_url, SeedInput, Settings,
};
use ebay_scraper::crawler::scrape;
use ebay_scraper::output::{export_all, print_report, ExportFormat};
use ebay_scraper::url::resolve_search_urls;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Settings file read when `--config` is not given, if it exists
const DEFAULT_CONFIG: &str = "config/settings.toml";

/// Exit status when every seed failed and nothing was collected
const EXIT_ALL_FAILED: u8 = 2;

/// ebay-scraper: structured listing extraction from eBay search results
///
/// Crawls eBay search result pages for the given URLs and keywords,
/// optionally follows every item page for detail fields, and exports the
/// collected listings as JSON, CSV, XML or XLSX.
#[derive(Parser, Debug)]
#[command(name = "ebay-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Structured listing extraction from eBay search results", long_about = None)]
struct Cli {
    /// Path to TOML settings file [default: config/settings.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to JSON seed input with "urls" and "keywords"
    #[arg(long, value_name = "FILE", default_value = "data/sample_input.json")]
    input: PathBuf,

    /// Directory receiving the export files
    #[arg(long, value_name = "DIR", default_value = "data")]
    output_dir: PathBuf,

    /// Comma-separated export formats (json, csv, xml, xlsx)
    #[arg(long, value_name = "LIST", value_delimiter = ',', default_value = "json,csv")]
    formats: Vec<String>,

    /// Maximum number of records, overriding the settings file
    #[arg(long, value_name = "N")]
    max_items: Option<usize>,

    /// Route every request through this proxy, overriding the settings file
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and input, print the search URLs and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ebay_scraper=info,warn"),
            1 => EnvFilter::new("ebay_scraper=debug,info"),
            2 => EnvFilter::new("ebay_scraper=trace,debug"),
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

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut settings = load_settings_for(cli.config.as_deref())?;

    if let Some(max_items) = cli.max_items {
        settings.input.max_items = max_items;
    }
    if let Some(proxy) = cli.proxy {
        validate_proxy_url(&proxy).context("Invalid --proxy")?;
        settings.proxies.single = None;
        settings.proxies.pool = vec![proxy];
    }

    let input = load_seed_input(&cli.input)
        .with_context(|| format!("Failed to load seed input {}", cli.input.display()))?;
    let seeds = resolve_search_urls(&input, &settings.input.region);
    let formats = parse_formats(&cli.formats);

    if cli.dry_run {
        handle_dry_run(&settings, &input, &seeds, &formats);
        return Ok(ExitCode::SUCCESS);
    }

    handle_scrape(&settings, &seeds, &formats, &cli.output_dir).await
}

/// Loads the settings file, falling back to defaults when the default path
/// is absent
fn load_settings_for(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => {
            tracing::info!("No settings file at {}, using defaults", DEFAULT_CONFIG);
            return Ok(Settings::default());
        }
    };

    tracing::info!("Loading settings from: {}", path.display());
    let (settings, hash) = load_settings_with_hash(path)
        .with_context(|| format!("Failed to load settings {}", path.display()))?;
    tracing::info!("Settings loaded successfully (hash: {})", hash);

    Ok(settings)
}

/// Parses the requested formats, dropping unsupported ones with a warning
fn parse_formats(names: &[String]) -> Vec<ExportFormat> {
    names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .filter_map(|name| match name.parse::<ExportFormat>() {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::warn!("{}; skipping", e);
                None
            }
        })
        .collect()
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(settings: &Settings, input: &SeedInput, seeds: &[String], formats: &[ExportFormat]) {
    println!("=== ebay-scraper Dry Run ===\n");

    println!("Input Settings:");
    println!("  Region: {}", settings.input.region);
    println!("  Max items: {}", settings.input.max_items);
    println!("  Delay: {}s", settings.input.delay_seconds);
    println!("  Follow item pages: {}", settings.input.follow_item_page);
    println!("  Drop empty records: {}", settings.input.drop_empty_records);

    println!("\nHTTP:");
    println!("  User agent: {}", settings.http.user_agent);
    println!("  Timeout: {}s", settings.http.timeout_seconds);

    println!("\nProxies:");
    match &settings.proxies.single {
        Some(_) => println!("  Single fixed proxy"),
        None if settings.proxies.pool.is_empty() => println!("  Direct connection"),
        None => println!(
            "  Pool of {} (rotate: {})",
            settings.proxies.pool.len(),
            settings.proxies.rotate
        ),
    }

    let formats: Vec<String> = formats.iter().map(ToString::to_string).collect();
    println!("\nFormats: json (snapshot), {}", formats.join(", "));

    println!(
        "\nSearch URLs ({} from {} urls, {} keywords):",
        seeds.len(),
        input.urls().count(),
        input.keywords().count()
    );
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Settings and input are valid");
}

/// Handles the main scrape operation
async fn handle_scrape(
    settings: &Settings,
    seeds: &[String],
    formats: &[ExportFormat],
    output_dir: &Path,
) -> anyhow::Result<ExitCode> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current request");
            on_interrupt.cancel();
        }
    });

    let report = scrape(settings, seeds, cancel).await?;

    if report.all_failed() {
        tracing::error!("Every seed URL failed; nothing was collected");
        print_report(&report, &[]);
        return Ok(ExitCode::from(EXIT_ALL_FAILED));
    }

    if report.is_empty() {
        tracing::warn!("No records collected; no files written");
        print_report(&report, &[]);
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = export_all(&report.records, output_dir, formats, chrono::Local::now())
        .with_context(|| format!("Failed to prepare output directory {}", output_dir.display()))?;

    print_report(&report, &outcome.written);
    Ok(ExitCode::SUCCESS)
}

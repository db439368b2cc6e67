//! Listing crawler main entry point
//!
//! This is the command-line interface for the paginated listing crawler.

use anyhow::{bail, Context};
use clap::Parser;
use listing_crawler::config::{load_config_with_hash, validate, Config};
use listing_crawler::crawler::run_crawl;
use listing_crawler::output::print_report;
use listing_crawler::url::redact_credentials;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing crawler: saves detail pages from a paginated search listing
///
/// Walks the listing page by page, queues every new item it finds and saves
/// each item's detail page until the target count is reached or the listing
/// runs out.
#[derive(Parser, Debug)]
#[command(name = "listing-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Sequential paginated listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First listing page to fetch
    #[arg(long, env = "START_URL")]
    start_url: Option<String>,

    /// Number of detail pages to save
    #[arg(long, env = "MAX_PAGES")]
    max_pages: Option<u32>,

    /// Directory saved pages are written to
    #[arg(long, env = "OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Delay after each detail page in milliseconds (doubled between listing pages)
    #[arg(long, env = "CRAWL_DELAY")]
    delay_ms: Option<u64>,

    /// Listing page size hint
    #[arg(long, env = "PAGE_SIZE")]
    page_size: Option<u32>,

    /// Proxy for all requests (http, https, socks5)
    #[arg(long)]
    proxy: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_crawler=info,warn"),
            1 => EnvFilter::new("listing_crawler=debug,info"),
            2 => EnvFilter::new("listing_crawler=trace,debug"),
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

/// Loads the config file (if any), applies CLI/env overrides and validates
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, cli);
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.delay_ms = delay_ms;
    }
    if let Some(page_size) = cli.page_size {
        config.crawler.page_size = page_size;
    }

    let proxy = cli
        .proxy
        .clone()
        .or_else(|| std::env::var("HTTP_PROXY").ok())
        .or_else(|| std::env::var("HTTPS_PROXY").ok())
        .filter(|p| !p.trim().is_empty());
    if proxy.is_some() {
        config.network.proxy_url = proxy;
    }
}

fn print_banner(config: &Config) {
    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Target pages: {}", config.crawler.max_pages);
    println!("  Page size: {}", config.crawler.page_size);
    println!(
        "  Delay: {}ms per item, {}ms between listing pages",
        config.crawler.delay_ms,
        config.crawler.delay_ms.saturating_mul(2)
    );
    if let Some(limit) = config.crawler.max_listing_pages {
        println!("  Listing page limit: {}", limit);
    }

    println!("\nNetwork:");
    match &config.network.proxy_url {
        Some(proxy) => println!("  Proxy: {}", redact_credentials(proxy)),
        None => println!("  Proxy: none"),
    }
    println!("  Timeout: {}s", config.network.timeout_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
}

/// Handles the --dry-run mode: shows the effective settings without crawling
fn handle_dry_run(config: &Config) {
    println!("=== Listing Crawler Dry Run ===\n");
    print_banner(config);
    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    println!("=== Listing Crawler ===\n");
    print_banner(&config);
    println!();

    let report = run_crawl(config).await.context("failed to start crawl")?;

    println!();
    print_report(&report);

    if let Some(e) = report.error() {
        tracing::error!("Crawl failed: {}", e);
        bail!("crawl aborted: {}", e);
    }

    tracing::info!("Crawl completed successfully");
    Ok(())
}

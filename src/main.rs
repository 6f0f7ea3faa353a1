//! Book-Harvester main entry point
//!
//! This is the command-line interface for the Book-Harvester catalog scraper.

use anyhow::Context;
use book_harvester::config::{load_config_with_hash, validate, Config, OutputFormat};
use book_harvester::output::to_text_dump;
use book_harvester::{scrape_books, ScrapeOptions, ScrapeOutput};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Book-Harvester: a paginated catalog scraper
///
/// Walks the catalog pages, extracts every listed book with a pool of
/// concurrent workers and prints the records as JSON or plain text.
#[derive(Parser, Debug)]
#[command(name = "book-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A paginated book catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First catalog page to walk
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Number of catalog pages to walk (0 = all)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pages: Option<i64>,

    /// Number of concurrent item workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Also write the result to the output file
    #[arg(long)]
    save: bool,

    /// Emit a plain-text dump instead of JSON
    #[arg(long)]
    text: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let catalog_url = config.scraper.catalog_url.clone();
    let options = ScrapeOptions::from_config(&config);

    tracing::info!(
        "Scraping {} (page limit: {}, workers: {})",
        catalog_url,
        options.page_limit,
        options.workers
    );

    let output = scrape_books(&catalog_url, &options)
        .await
        .with_context(|| format!("Scrape of {} failed", catalog_url))?;

    match output {
        ScrapeOutput::Serialized(json) => println!("{}", json),
        ScrapeOutput::Records(records) => print!("{}", to_text_dump(&records)),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the scraped records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("book_harvester=info,warn"),
            1 => EnvFilter::new("book_harvester=debug,info"),
            2 => EnvFilter::new("book_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.scraper.catalog_url = url.clone();
    }
    if let Some(pages) = cli.pages {
        config.scraper.page_limit = pages;
    }
    if let Some(workers) = cli.workers {
        config.scraper.workers = workers;
    }
    if cli.save {
        config.output.persist = true;
    }
    if cli.text {
        config.output.format = OutputFormat::Text;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

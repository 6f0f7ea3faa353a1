//! Batch coordinator - main scrape orchestration logic
//!
//! This module drives a complete scrape:
//! - Running the pagination walk to collect item URLs
//! - Fanning extraction out over a bounded worker pool
//! - Dropping failed items while keeping discovery order
//! - Serializing and persisting the surviving records
//! - Reporting run statistics through the observer

use crate::config::{Config, HttpConfig, OutputFormat, UserAgentConfig, DEFAULT_WORKERS};
use crate::crawler::extractor::{extract, ExtractError, ExtractOutcome};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::observer::{ScrapeObserver, TracingObserver};
use crate::crawler::pagination::discover_item_urls_with_observer;
use crate::output::{self, ScrapeStatistics};
use crate::record::ProductRecord;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Options for one scrape invocation
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Write the result to `output_path`
    pub persist: bool,

    /// Return (and write) JSON text instead of record values
    pub as_serialized_text: bool,

    /// Catalog pages to walk: 0 for all, negative for none
    pub page_limit: i64,

    /// Width of the extraction worker pool
    pub workers: usize,

    /// Output file; `None` means `../artifacts/books_data.txt`
    pub output_path: Option<PathBuf>,

    /// HTTP deadlines
    pub http: HttpConfig,

    /// User agent identification
    pub user_agent: UserAgentConfig,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            persist: false,
            as_serialized_text: true,
            page_limit: 0,
            workers: DEFAULT_WORKERS,
            output_path: None,
            http: HttpConfig::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}

impl ScrapeOptions {
    /// Builds options from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            persist: config.output.persist,
            as_serialized_text: config.output.format == OutputFormat::Json,
            page_limit: config.scraper.page_limit,
            workers: config.scraper.workers,
            output_path: config.output.path.as_ref().map(PathBuf::from),
            http: config.http.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn format(&self) -> OutputFormat {
        if self.as_serialized_text {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Result of a scrape
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutput {
    /// Extracted records, in discovery order
    Records(Vec<ProductRecord>),

    /// The records serialized as an indented JSON array
    Serialized(String),
}

impl ScrapeOutput {
    /// Returns the records if the output was not serialized
    pub fn into_records(self) -> Option<Vec<ProductRecord>> {
        match self {
            Self::Records(records) => Some(records),
            Self::Serialized(_) => None,
        }
    }

    /// Returns the JSON text if the output was serialized
    pub fn into_serialized(self) -> Option<String> {
        match self {
            Self::Serialized(text) => Some(text),
            Self::Records(_) => None,
        }
    }
}

/// Main scrape coordinator
pub struct Coordinator {
    options: ScrapeOptions,
    observer: Arc<dyn ScrapeObserver>,
}

impl Coordinator {
    /// Creates a coordinator reporting through `tracing`
    pub fn new(options: ScrapeOptions) -> Self {
        Self::with_observer(options, Arc::new(TracingObserver))
    }

    /// Creates a coordinator reporting through the given observer
    pub fn with_observer(options: ScrapeOptions, observer: Arc<dyn ScrapeObserver>) -> Self {
        Self { options, observer }
    }

    /// Runs a complete scrape of the catalog starting at `catalog_url`
    ///
    /// 1. Walk the catalog with a dedicated client; a walk failure ends the run
    /// 2. With no URLs, return an empty result without extracting or writing
    /// 3. Extract every URL with a second client shared by all workers
    /// 4. Drop failed items, keeping discovery order for the rest
    /// 5. Serialize and persist as requested
    /// 6. Report statistics through the observer
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeOutput)` - Records or their JSON text
    /// * `Err(HarvestError)` - The walk failed, or the output could not be written
    pub async fn run(&self, catalog_url: &str) -> Result<ScrapeOutput, HarvestError> {
        let start_time = Instant::now();

        let urls = {
            let client = self.build_client()?;
            discover_item_urls_with_observer(
                &client,
                catalog_url,
                self.options.page_limit,
                self.observer.as_ref(),
            )
            .await?
        };

        if urls.is_empty() {
            self.observer.on_batch_complete(&ScrapeStatistics {
                elapsed: start_time.elapsed(),
                ..ScrapeStatistics::default()
            });
            return self.finish(Vec::new());
        }

        let client = self.build_client()?;
        let outcomes = self.extract_all(&client, &urls).await;
        drop(client);

        let mut records = Vec::with_capacity(outcomes.len());
        let mut dropped = 0;
        for outcome in outcomes {
            match outcome {
                ExtractOutcome::Success(record) if !record.is_empty() => records.push(record),
                ExtractOutcome::Success(_) => dropped += 1,
                ExtractOutcome::Failure { url, error } => {
                    self.observer.on_item_dropped(&url, &error);
                    dropped += 1;
                }
            }
        }

        let extracted = records.len();
        let output = self.persist_and_package(records)?;

        self.observer.on_batch_complete(&ScrapeStatistics {
            discovered: urls.len(),
            extracted,
            dropped,
            elapsed: start_time.elapsed(),
        });

        Ok(output)
    }

    /// Extracts every URL with at most `workers` extractions in flight
    ///
    /// Each extraction runs as its own task; a panicking task becomes a
    /// `Failure` instead of aborting the batch. Outcomes are returned in the
    /// order of `urls`, whatever order the fetches complete in.
    pub async fn extract_all(&self, client: &Client, urls: &[String]) -> Vec<ExtractOutcome> {
        let width = self.options.workers.max(1);

        stream::iter(urls.iter().cloned())
            .map(|url| {
                let client = client.clone();
                async move {
                    let task_url = url.clone();
                    let handle = tokio::spawn(async move { extract(&client, &task_url).await });
                    handle.await.unwrap_or_else(|e| ExtractOutcome::Failure {
                        url,
                        error: ExtractError::Worker(e.to_string()),
                    })
                }
            })
            .buffered(width)
            .collect()
            .await
    }

    fn build_client(&self) -> Result<Client, HarvestError> {
        Ok(build_http_client(
            &self.options.user_agent,
            &self.options.http,
        )?)
    }

    fn finish(&self, records: Vec<ProductRecord>) -> Result<ScrapeOutput, HarvestError> {
        if self.options.as_serialized_text {
            Ok(ScrapeOutput::Serialized(output::to_json(&records)?))
        } else {
            Ok(ScrapeOutput::Records(records))
        }
    }

    fn persist_and_package(
        &self,
        records: Vec<ProductRecord>,
    ) -> Result<ScrapeOutput, HarvestError> {
        if self.options.persist {
            let path = match &self.options.output_path {
                Some(path) => path.clone(),
                None => output::default_output_path()?,
            };
            let content = output::render(&records, self.options.format())?;
            output::write_output(&path, &content)?;
            self.observer.on_output_written(&path, content.len());
        }

        self.finish(records)
    }
}

/// Scrapes a catalog, logging progress through `tracing`
///
/// # Arguments
///
/// * `catalog_url` - URL of the first catalog page
/// * `options` - Persistence, output format, page limit and pool width
///
/// # Returns
///
/// * `Ok(ScrapeOutput)` - Records, or their JSON text when
///   `options.as_serialized_text` is set
/// * `Err(HarvestError)` - The catalog walk failed or the output file could not be written
///
/// # Example
///
/// ```no_run
/// use book_harvester::{scrape_books, ScrapeOptions};
///
/// # async fn example() -> Result<(), book_harvester::HarvestError> {
/// let options = ScrapeOptions {
///     page_limit: 1,
///     as_serialized_text: false,
///     ..ScrapeOptions::default()
/// };
/// let output = scrape_books("http://books.toscrape.com/catalogue/page-1.html", &options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn scrape_books(
    catalog_url: &str,
    options: &ScrapeOptions,
) -> Result<ScrapeOutput, HarvestError> {
    Coordinator::new(options.clone()).run(catalog_url).await
}

/// Scrapes a catalog, reporting progress through `observer`
pub async fn scrape_books_with_observer(
    catalog_url: &str,
    options: &ScrapeOptions,
    observer: Arc<dyn ScrapeObserver>,
) -> Result<ScrapeOutput, HarvestError> {
    Coordinator::with_observer(options.clone(), observer)
        .run(catalog_url)
        .await
}

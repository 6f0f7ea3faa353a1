use serde::Deserialize;

/// Default catalog entry page
pub const DEFAULT_CATALOG_URL: &str = "http://books.toscrape.com/catalogue/page-1.html";

/// Default number of concurrent item workers
pub const DEFAULT_WORKERS: usize = 10;

/// Main configuration structure for Book-Harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scrape run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// First catalog page to start the walk from
    #[serde(rename = "catalog-url")]
    pub catalog_url: String,

    /// Number of catalog pages to walk (0 = all, negative = nothing)
    #[serde(rename = "page-limit")]
    pub page_limit: i64,

    /// Width of the item extraction worker pool
    pub workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            page_limit: 0,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BookHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/book-harvester".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request deadline in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment deadline in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl HttpConfig {
    /// Connect deadline capped at the whole-request deadline
    pub fn effective_connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs.min(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Serialized representation of a finished scrape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON array of records
    #[default]
    Json,
    /// Plain `Key: Value` dump, records separated by a blank line
    Text,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to write the result to disk
    pub persist: bool,

    /// Representation returned and written
    pub format: OutputFormat,

    /// Output file; defaults to `artifacts/books_data.txt` beside the working directory
    pub path: Option<String>,
}

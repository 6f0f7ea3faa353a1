//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the shared HTTP client with the configured user agent and deadlines
//! - Single-attempt GET requests for catalog and item pages
//! - UTF-8 decoding of the body regardless of the declared charset
//! - Error classification into a `FetchResult` value

use crate::config::{HttpConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
///
/// Failures are values, not errors: the caller decides whether a failed fetch
/// ends the run (pagination) or only drops one item (extraction).
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body decoded as UTF-8
        body: String,
    },

    /// Server answered with a non-success status code
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the page body is available
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Consumes the result, returning the markup on success
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    /// Human-readable reason for a failed fetch
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client pools connections internally and is cheap to clone, so one
/// instance can be shared by every worker of a phase.
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Request and connect deadlines
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use book_harvester::config::{HttpConfig, UserAgentConfig};
/// use book_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.effective_connect_timeout_secs()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a single GET request
///
/// There is no retry: a failed attempt is reported immediately. The body is
/// decoded as UTF-8 whatever charset the server declares, with invalid
/// sequences replaced.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.bytes().await {
        Ok(bytes) => FetchResult::Success {
            body: String::from_utf8_lossy(&bytes).into_owned(),
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}

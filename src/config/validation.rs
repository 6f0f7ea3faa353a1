use crate::config::types::{Config, HttpConfig, OutputConfig, ScraperConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scrape run configuration
///
/// A negative page limit is not rejected here: it is a valid request for an
/// empty result.
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.catalog_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid catalog-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "catalog-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates HTTP deadlines
///
/// A connect timeout longer than the request timeout is accepted; the client
/// caps it at the request timeout.
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

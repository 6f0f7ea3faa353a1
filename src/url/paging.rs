use crate::UrlError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn page_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("page number pattern is a valid regex"))
}

/// Builds the URL of the catalog page numbered `page_number`
///
/// The first run of decimal digits in the URL path is taken to be the page
/// number and is replaced. Host and port are never touched, so
/// `http://127.0.0.1:8080/catalogue/page-1.html` becomes
/// `http://127.0.0.1:8080/catalogue/page-2.html`.
///
/// This only works for catalogs that encode the page number as a literal
/// decimal in the path. Any other scheme yields the wrong URL or
/// [`UrlError::NoPageNumber`].
///
/// # Arguments
///
/// * `page_url` - URL of any catalog page
/// * `page_number` - Page number to substitute
///
/// # Returns
///
/// * `Ok(String)` - The URL of the requested page
/// * `Err(UrlError)` - The URL is malformed or its path has no digits
pub fn next_page_url(page_url: &str, page_number: u32) -> Result<String, UrlError> {
    let mut url = Url::parse(page_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    let path = url.path().to_string();
    if !page_number_pattern().is_match(&path) {
        return Err(UrlError::NoPageNumber(page_url.to_string()));
    }

    let replaced = page_number_pattern().replacen(&path, 1, page_number.to_string());
    url.set_path(&replaced);

    Ok(url.to_string())
}

use crate::UrlError;
use url::Url;

/// Validates that a catalog URL is an absolute HTTP(S) URL
///
/// # Arguments
///
/// * `url_str` - The catalog URL as given by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The URL is malformed or not HTTP(S)
pub fn parse_catalog_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Derives the base path of a catalog URL by dropping its last path segment
///
/// # Examples
///
/// ```
/// use book_harvester::url::base_path;
///
/// assert_eq!(
///     base_path("http://books.toscrape.com/catalogue/page-1.html"),
///     "http://books.toscrape.com/catalogue"
/// );
/// ```
pub fn base_path(catalog_url: &str) -> &str {
    catalog_url
        .rsplit_once('/')
        .map(|(head, _)| head)
        .unwrap_or("")
}

/// Joins a page-relative href onto a base path as `base/href`
///
/// The href is appended verbatim; catalog links are always relative to the
/// directory that holds the catalog pages.
pub fn resolve_item_url(base_path: &str, href: &str) -> String {
    format!("{}/{}", base_path, href)
}

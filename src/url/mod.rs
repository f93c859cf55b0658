//! URL handling module for Folder-Sweep
//!
//! Folder pages are identified by URL. This module provides the normalization
//! used for every identity comparison the crawler makes (visited set, self
//! links, breadcrumb ancestors).

mod normalize;

pub use normalize::normalize_url;

/// Returns the identity key for a URL
///
/// The key is the normalized URL when the input parses, otherwise the trimmed
/// input itself, so that malformed links still compare equal to themselves.
///
/// # Examples
///
/// ```
/// use folder_sweep::url::url_key;
///
/// assert_eq!(
///     url_key("https://Example.com/channel/1/"),
///     url_key("https://example.com/channel/1#list")
/// );
/// ```
pub fn url_key(url: &str) -> String {
    match normalize_url(url) {
        Ok(normalized) => normalized.to_string(),
        Err(_) => url.trim().to_string(),
    }
}

/// Returns true if two URLs name the same page
pub fn same_page(a: &str, b: &str) -> bool {
    url_key(a) == url_key(b)
}

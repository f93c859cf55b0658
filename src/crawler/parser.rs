//! HTML parser for folder pages
//!
//! This module handles parsing a folder page to extract:
//! - The breadcrumb trail (folder ancestry)
//! - Document links (URL carries the document path and an identifier parameter)
//! - Sub-folder links (URL carries the folder navigation path)

use crate::config::FetcherConfig;
use crate::crawler::fetcher::{BreadcrumbEntry, FetchedPage, PageLink};
use crate::url::url_key;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Breadcrumb separator glyph; entries containing it are not folder names
const BREADCRUMB_SEPARATOR: char = '❯';

/// Link labels that navigate within the hierarchy rather than into it
const NAVIGATION_LABELS: &[&str] = &[
    "up", "home", "back", "parent", "upp", "hem", "tillbaka", "start", "..",
];

/// URL fragments that classify links on a folder page
#[derive(Debug, Clone)]
pub struct PagePatterns {
    /// Path fragment of document links (e.g. `/document/`)
    pub document_path: String,

    /// Identifier parameter of document links (e.g. `hash=`)
    pub document_param: String,

    /// Path fragment of folder navigation links (e.g. `/channel/`)
    pub folder_path: String,

    /// CSS selector of the breadcrumb container
    pub breadcrumb_selector: String,
}

impl Default for PagePatterns {
    fn default() -> Self {
        Self::from(&FetcherConfig::default())
    }
}

impl From<&FetcherConfig> for PagePatterns {
    fn from(config: &FetcherConfig) -> Self {
        Self {
            document_path: config.document_path.clone(),
            document_param: config.document_param.clone(),
            folder_path: config.folder_path.clone(),
            breadcrumb_selector: config.breadcrumb_selector.clone(),
        }
    }
}

impl PagePatterns {
    fn is_document(&self, url: &str) -> bool {
        url.contains(&self.document_path) && url.contains(&self.document_param)
    }

    fn is_folder(&self, url: &str) -> bool {
        url.contains(&self.folder_path)
    }
}

/// Returns true if a link label is navigation chrome rather than a folder name
///
/// Empty labels, single non-alphanumeric glyphs (`❯`, `«`, `^`) and known
/// navigation words are navigation.
///
/// # Examples
///
/// ```
/// use folder_sweep::crawler::is_navigation_label;
///
/// assert!(is_navigation_label("  "));
/// assert!(is_navigation_label("«"));
/// assert!(is_navigation_label("Tillbaka"));
/// assert!(!is_navigation_label("Protokoll 2022"));
/// ```
pub fn is_navigation_label(label: &str) -> bool {
    let label = label.trim();

    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return true,
        (Some(c), None) if !c.is_alphanumeric() => return true,
        _ => {}
    }

    let lowered = label.to_lowercase();
    NAVIGATION_LABELS.contains(&lowered.as_str())
}

/// Parses a folder page and extracts breadcrumb, documents and sub-folders
///
/// # Link Classification Rules
///
/// **Documents:** URL contains both the document path and the identifier
/// parameter. The label is the link text, or the URL when the text is blank.
/// Repeated links to the same document are reported once.
///
/// **Sub-folders:** URL contains the folder path, and
/// - it does not point at the page itself,
/// - it does not point at a breadcrumb ancestor,
/// - its label is not navigation (see [`is_navigation_label`]).
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page's own URL, for resolving relative links
/// * `patterns` - URL fragments that classify links
///
/// # Returns
///
/// * `Ok(FetchedPage)` - Successfully parsed page
/// * `Err(String)` - The breadcrumb selector is invalid
///
/// # Example
///
/// ```
/// use folder_sweep::crawler::{parse_page, PagePatterns};
/// use url::Url;
///
/// let html = r#"<html><body>
///     <a href="/document/1?hash=ab12">Protokoll.pdf</a>
///     <a href="/reader/r1/channel/7">2022</a>
/// </body></html>"#;
/// let page_url = Url::parse("https://example.com/reader/r1/channel/1").unwrap();
/// let page = parse_page(html, &page_url, &PagePatterns::default()).unwrap();
/// assert_eq!(page.documents[0].label, "Protokoll.pdf");
/// assert_eq!(page.subfolders[0].url, "https://example.com/reader/r1/channel/7");
/// ```
pub fn parse_page(
    html: &str,
    page_url: &Url,
    patterns: &PagePatterns,
) -> Result<FetchedPage, String> {
    let document = Html::parse_document(html);

    let breadcrumb = extract_breadcrumb(&document, page_url, &patterns.breadcrumb_selector)?;

    let mut excluded_keys: HashSet<String> = breadcrumb
        .iter()
        .filter_map(|entry| entry.url.as_deref())
        .map(url_key)
        .collect();
    excluded_keys.insert(url_key(page_url.as_str()));

    let mut documents: Vec<PageLink> = Vec::new();
    let mut seen_documents: HashSet<String> = HashSet::new();
    let mut subfolders = Vec::new();
    let mut seen_folders: HashSet<String> = HashSet::new();

    for (label, url) in extract_links(&document, page_url) {
        if patterns.is_document(&url) {
            let key = url_key(&url);
            if seen_documents.insert(key) {
                let label = if label.is_empty() { url.clone() } else { label };
                documents.push(PageLink { label, url });
            } else if !label.is_empty() {
                // An icon link may precede the titled one
                if let Some(existing) = documents.iter_mut().find(|d| d.url == url) {
                    if existing.label == existing.url {
                        existing.label = label;
                    }
                }
            }
        } else if patterns.is_folder(&url) {
            let key = url_key(&url);
            if excluded_keys.contains(&key) || is_navigation_label(&label) {
                continue;
            }
            if seen_folders.insert(key) {
                subfolders.push(PageLink { label, url });
            }
        }
    }

    Ok(FetchedPage {
        breadcrumb,
        documents,
        subfolders,
    })
}

/// Extracts the breadcrumb trail
///
/// Leaf `div` elements inside the container are the trail entries (falling
/// back to `a` elements when the container has no divs). Blank entries and
/// separator glyphs are dropped. A missing container yields an empty trail.
fn extract_breadcrumb(
    document: &Html,
    base_url: &Url,
    selector: &str,
) -> Result<Vec<BreadcrumbEntry>, String> {
    let container_selector = Selector::parse(selector)
        .map_err(|e| format!("Invalid breadcrumb selector '{}': {:?}", selector, e))?;
    let div_selector = Selector::parse("div").map_err(|e| format!("{:?}", e))?;
    let a_selector = Selector::parse("a[href]").map_err(|e| format!("{:?}", e))?;

    let Some(container) = document.select(&container_selector).next() else {
        return Ok(Vec::new());
    };

    let mut items: Vec<ElementRef> = container
        .select(&div_selector)
        .filter(|div| !has_child_div(div))
        .collect();
    if items.is_empty() {
        items = container.select(&a_selector).collect();
    }

    let entries = items
        .into_iter()
        .filter_map(|item| {
            let label = element_text(&item);
            if label.is_empty() || label.contains(BREADCRUMB_SEPARATOR) {
                return None;
            }

            let href = if item.value().name() == "a" {
                item.value().attr("href")
            } else {
                item.select(&a_selector)
                    .next()
                    .and_then(|a| a.value().attr("href"))
            };
            let url = href.and_then(|href| resolve_link(href, base_url));

            Some(BreadcrumbEntry { label, url })
        })
        .collect();

    Ok(entries)
}

fn has_child_div(element: &ElementRef) -> bool {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| child.value().name() == "div")
}

/// Collapses an element's text content to single-spaced, trimmed text
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts `(label, absolute URL)` for every usable `<a href>` in page order
fn extract_links(document: &Html, base_url: &Url) -> Vec<(String, String)> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push((element_text(&element), absolute_url));
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

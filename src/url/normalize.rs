use crate::UrlError;
use url::Url;

/// Query keys added by mail and social trackers; they never select a folder
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a folder or document URL so that two links naming the same
/// page compare equal
///
/// The archive renders the same folder under several spellings (`www.` or
/// not, trailing slash, `#list` anchors, tracking parameters appended by
/// mail links). The normalized form:
///
/// - keeps the scheme, which must be HTTP or HTTPS
/// - lowercases the host and drops a leading `www.`
/// - collapses empty path segments and drops a trailing slash
/// - drops the fragment
/// - drops tracking parameters and orders the rest by key
///
/// Identifying parameters such as `hash=` on document links survive
/// untouched.
///
/// # Examples
///
/// ```
/// use folder_sweep::url::normalize_url;
///
/// let url = normalize_url("https://WWW.Example.com/reader/r1/channel/42/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/reader/r1/channel/42");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "folder pages are served over HTTP(S), got: {}",
                other
            )))
        }
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("cannot set host '{}': {}", host, e)))?;

    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    let path = format!("/{}", segments.join("/"));
    url.set_path(&path);

    url.set_fragment(None);

    if url.query().is_some() {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        pairs.sort();

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
    }

    Ok(url)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

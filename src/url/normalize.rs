use crate::UrlError;
use url::Url;

/// Query parameters that carry tracking state, not content identity.
/// Stripping them keeps the frontier dedup key stable across link variants.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Normalizes a URL into the canonical form used as the frontier dedup key.
///
/// Two links that reach the same resource must normalize identically, or
/// the at-most-once fetch guarantee degrades into duplicate work. The
/// canonical form:
///
/// 1. Parses the URL; malformed input is rejected
/// 2. Requires an HTTP(S) scheme
/// 3. Lowercases the host and strips a leading `www.`
/// 4. Collapses the path (dot segments, repeated slashes, trailing slash)
/// 5. Drops the fragment
/// 6. Drops tracking query parameters and sorts the survivors
///
/// # Examples
///
/// ```
/// use ezhuthu::url::normalize_url;
///
/// let url = normalize_url("http://WWW.EXAMPLE.COM/page/?b=2&a=1#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page?a=1&b=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    let mut canonical_host = host.to_lowercase();
    if let Some(stripped) = canonical_host.strip_prefix("www.") {
        canonical_host = stripped.to_string();
    }
    url.set_host(Some(&canonical_host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let collapsed = collapse_path(url.path());
    url.set_path(&collapsed);

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Extracts the lowercase host of a URL, if it has one.
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Collapses dot segments, repeated slashes, and the trailing slash.
fn collapse_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

use crate::UrlError;
use url::Url;

/// Normalizes an origin URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse the URL; reject if malformed
/// 3. Require an HTTP(S) scheme and a host
/// 4. Lowercase the host (done by the parser)
/// 5. Drop the fragment
/// 6. Drop a bare trailing `/` so `https://a.test/` and `https://a.test` name the same origin
///
/// The returned string is the literal form used both as the crawl's start URL
/// and as the cache key for the origin.
///
/// # Examples
///
/// ```
/// use site_ingest::url::normalize_origin;
///
/// assert_eq!(normalize_origin(" https://A.Test/ ").unwrap(), "https://a.test");
/// assert_eq!(normalize_origin("https://a.test/docs/").unwrap(), "https://a.test/docs/");
/// ```
pub fn normalize_origin(raw: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let mut normalized = url.to_string();
    if url.path() == "/" && url.query().is_none() && normalized.ends_with('/') {
        normalized.pop();
    }

    Ok(normalized)
}

/// Builds the origin URL for a bare domain, as reported by an account lookup
///
/// # Examples
///
/// ```
/// use site_ingest::url::origin_from_domain;
///
/// assert_eq!(origin_from_domain("ripple.com").unwrap(), "https://ripple.com");
/// ```
pub fn origin_from_domain(domain: &str) -> Result<String, UrlError> {
    let domain = domain.trim().trim_end_matches('/');
    if domain.is_empty() {
        return Err(UrlError::MissingDomain);
    }
    normalize_origin(&format!("https://{}", domain))
}

use url::Url;

/// Second-level labels that act as registry qualifiers (as in `co.uk`, `com.au`)
const GENERIC_SECOND_LEVEL: &[&str] = &["co", "com", "net", "org", "gov"];

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_ingest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives a short organization label from a URL or bare hostname
///
/// Takes the second-from-last dot-separated label of the host. When that label
/// is a generic registry qualifier (`shop.example.co.uk`), the label before it
/// is used instead. Hosts with one or two labels yield their first label.
///
/// # Examples
///
/// ```
/// use site_ingest::url::extract_company_label;
///
/// assert_eq!(extract_company_label("https://shop.example.co.uk"), "example");
/// assert_eq!(extract_company_label("example.com"), "example");
/// assert_eq!(extract_company_label("localhost"), "localhost");
/// ```
pub fn extract_company_label(url: &str) -> String {
    let with_scheme = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    let hostname = Url::parse(&with_scheme)
        .ok()
        .and_then(|parsed| extract_domain(&parsed))
        .unwrap_or_else(|| url.to_string());

    let parts: Vec<&str> = hostname.split('.').collect();
    let label = match parts.len() {
        n if n > 2 => {
            let second = parts[n - 2];
            if GENERIC_SECOND_LEVEL.contains(&second) {
                parts[n - 3]
            } else {
                second
            }
        }
        _ => parts[0],
    };

    label.to_string()
}

/// Name of the staging file for an origin: its network location plus `.txt`
///
/// The port is kept when present, so two local origins never share a file.
pub fn staging_file_name(origin: &Url) -> Option<String> {
    let host = extract_domain(origin)?;
    Some(match origin.port() {
        Some(port) => format!("{}:{}.txt", host, port),
        None => format!("{}.txt", host),
    })
}

use serde::Deserialize;
use url::Url;

/// Policy deciding whether a resolved link belongs to the origin being crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginMatch {
    /// The literal origin string must occur somewhere in the link.
    ///
    /// This is loose on purpose: `https://a.test.evil.com/` and
    /// `https://other.com/?u=https://a.test` both pass for origin `https://a.test`.
    #[default]
    Substring,

    /// The link's host must equal the origin's host
    ExactHost,
}

impl OriginMatch {
    /// Returns true if `candidate` is considered part of `origin`
    ///
    /// # Examples
    ///
    /// ```
    /// use site_ingest::url::OriginMatch;
    ///
    /// let origin = "https://a.test";
    /// assert!(OriginMatch::Substring.matches(origin, "https://a.test.other.com/"));
    /// assert!(!OriginMatch::ExactHost.matches(origin, "https://a.test.other.com/"));
    /// assert!(OriginMatch::ExactHost.matches(origin, "http://A.test/page"));
    /// ```
    pub fn matches(&self, origin: &str, candidate: &str) -> bool {
        match self {
            Self::Substring => candidate.contains(origin),
            Self::ExactHost => match (host_of(origin), host_of(candidate)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_owned)
}

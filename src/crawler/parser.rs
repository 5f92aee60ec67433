//! HTML parser for extracting same-origin links
//!
//! # Resolution Rules
//!
//! - An href starting with `/` is joined onto the base URL
//! - An href without a network location (relative path, fragment, `mailto:`) is
//!   joined onto the base URL as well
//! - An href that already names a host is kept exactly as written
//!
//! # Filter Rule
//!
//! A resolved URL is kept only if it belongs to the base URL according to the
//! [`OriginMatch`] policy. The default policy is a plain substring test.

use crate::url::OriginMatch;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts the same-origin links of a document using the substring policy
///
/// # Example
///
/// ```
/// use site_ingest::crawler::extract_links;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.com/">Out</a>"#;
/// let links = extract_links("https://a.test", html);
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://a.test/about"]);
/// ```
pub fn extract_links(base_url: &str, html: &str) -> BTreeSet<String> {
    extract_links_with(base_url, html, OriginMatch::Substring)
}

/// Extracts the links of a document that belong to `base_url` under `policy`
///
/// Returns an empty set when `base_url` itself cannot be parsed.
pub fn extract_links_with(base_url: &str, html: &str, policy: OriginMatch) -> BTreeSet<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Cannot resolve links against {}: {}", base_url, e);
            return BTreeSet::new();
        }
    };

    let document = Html::parse_document(html);
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return BTreeSet::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, &base))
        .filter(|resolved| policy.matches(base_url, resolved))
        .collect()
}

/// Resolves a single href against the base URL
fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if !href.starts_with('/') {
        if let Ok(absolute) = Url::parse(href) {
            if absolute.has_host() {
                return Some(href.to_string());
            }
        }
    }

    base.join(href).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://a.test";

    fn links_of(html: &str) -> Vec<String> {
        extract_links(BASE, html).into_iter().collect()
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            links_of(r#"<a href="/about">About</a>"#),
            vec!["https://a.test/about"]
        );
    }

    #[test]
    fn test_path_relative_link() {
        assert_eq!(
            links_of(r#"<a href="team/people">Team</a>"#),
            vec!["https://a.test/team/people"]
        );
    }

    #[test]
    fn test_absolute_link_kept_as_written() {
        assert_eq!(
            links_of(r#"<a href="https://a.test/Docs?x=1">Docs</a>"#),
            vec!["https://a.test/Docs?x=1"]
        );
    }

    #[test]
    fn test_fragment_resolves_to_base() {
        assert_eq!(
            links_of(r##"<a href="#top">Top</a>"##),
            vec!["https://a.test/#top"]
        );
    }

    #[test]
    fn test_protocol_relative_link() {
        assert_eq!(
            links_of(r#"<a href="//a.test/x">X</a><a href="//cdn.other.com/y">Y</a>"#),
            vec!["https://a.test/x"]
        );
    }

    #[test]
    fn test_offsite_and_special_schemes_filtered() {
        let html = r#"
            <a href="https://other.com/page">Other</a>
            <a href="mailto:hello@a.test">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="http://a.test/insecure">Insecure</a>
        "#;
        assert!(links_of(html).is_empty());
    }

    #[test]
    fn test_substring_policy_is_loose() {
        let html = r#"
            <a href="https://a.test.mirror.net/copy">Mirror</a>
            <a href="https://other.com/?from=https://a.test">Embedded</a>
        "#;
        assert_eq!(
            links_of(html),
            vec![
                "https://a.test.mirror.net/copy",
                "https://other.com/?from=https://a.test"
            ]
        );
    }

    #[test]
    fn test_exact_host_policy() {
        let html = r#"
            <a href="https://a.test.mirror.net/copy">Mirror</a>
            <a href="/kept">Kept</a>
        "#;
        let links: Vec<String> = extract_links_with(BASE, html, OriginMatch::ExactHost)
            .into_iter()
            .collect();
        assert_eq!(links, vec!["https://a.test/kept"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"
            <a href="/x">One</a>
            <a href="https://a.test/x">Two</a>
            <a href=" /x ">Three</a>
        "#;
        assert_eq!(links_of(html), vec!["https://a.test/x"]);
    }

    #[test]
    fn test_anchors_without_href_ignored() {
        assert!(links_of(r#"<a name="x">No href</a><link href="/style.css">"#).is_empty());
    }

    #[test]
    fn test_relative_links_resolve_against_base_not_page() {
        let links: Vec<String> =
            extract_links("https://a.test/docs/", r#"<a href="intro">Intro</a>"#)
                .into_iter()
                .collect();
        assert_eq!(links, vec!["https://a.test/docs/intro"]);
    }

    #[test]
    fn test_unparseable_base() {
        assert!(extract_links("not a url", r#"<a href="/x">X</a>"#).is_empty());
    }
}

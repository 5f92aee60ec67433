//! Crawler module for fetching and flattening a single origin
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without retries
//! - HTML parsing and same-origin link extraction
//! - The bounded breadth-first traversal
//! - Aggregation of fetched pages into one text blob

mod aggregate;
mod fetcher;
mod parser;
mod traversal;

pub use aggregate::{aggregate, prettify};
pub use fetcher::{build_http_client, FetchFailure, FetchFailureReason, Fetcher};
pub use parser::{extract_links, extract_links_with};
pub use traversal::{CrawlReport, Crawler};

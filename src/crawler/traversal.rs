//! Traversal engine - the crawl loop for a single origin
//!
//! Each iteration pops one URL, fetches it, records its links, reports
//! progress, and marks it visited before the next URL is considered. Nothing
//! runs concurrently; the only suspension points are the page requests.

use crate::config::{CrawlConfig, FetcherConfig};
use crate::crawler::fetcher::{FetchFailure, Fetcher};
use crate::crawler::parser::extract_links_with;
use crate::state::{PageRecord, ProgressSink, Step, Termination, TraversalState};
use crate::IngestError;
use std::time::{Duration, Instant};

/// Result of crawling one origin
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The origin the crawl started from
    pub origin: String,

    /// Successfully fetched pages in visitation order
    pub pages: Vec<PageRecord>,

    /// Visit attempts that failed
    pub failures: Vec<FetchFailure>,

    /// Number of same-origin links on the origin's page
    pub home_links: usize,

    /// How the crawl ended
    pub termination: Termination,

    /// Last progress fraction reported
    pub progress: f64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of visit attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.pages.len() + self.failures.len()
    }
}

/// Single-origin breadth-first crawler
#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: Fetcher,
    config: CrawlConfig,
}

impl Crawler {
    /// Creates a crawler with its own HTTP client
    pub fn new(fetcher_config: &FetcherConfig, config: CrawlConfig) -> Result<Self, IngestError> {
        Ok(Self {
            fetcher: Fetcher::new(fetcher_config)?,
            config,
        })
    }

    /// Crawls `origin` and everything its home page links to
    ///
    /// # Algorithm
    ///
    /// 1. Pop the head of the frontier (initially just the origin)
    /// 2. If it is neither the origin nor a home link, stop the whole crawl
    /// 3. If it was already visited, move on
    /// 4. Fetch it; on success keep the page and queue its unvisited links.
    ///    The origin's links become the home link set.
    /// 5. Report progress and mark the URL visited, even when the fetch failed
    ///
    /// Once the loop ends the sink receives a final 1.0.
    pub async fn crawl(&self, origin: &str, progress: &mut dyn ProgressSink) -> CrawlReport {
        let start_time = Instant::now();
        let label = self.config.progress_label.as_str();
        let mut state = TraversalState::new(origin, self.config.min_progress_step);
        let mut pages = Vec::new();
        let mut failures = Vec::new();
        let mut last_reported = 0.0;

        tracing::info!("Starting crawl of {}", origin);

        let termination = loop {
            let url = match state.next_step() {
                Step::Visit(url) => url,
                Step::Skip(url) => {
                    tracing::trace!("Already visited {}", url);
                    continue;
                }
                Step::Stop(termination) => break termination,
            };

            tracing::debug!("Processing URL: {}", url);

            match self.fetcher.fetch(&url).await {
                Ok(html) => {
                    let links = extract_links_with(origin, &html, self.config.origin_match);
                    state.record_links(&url, &links);
                    tracing::debug!(
                        "Found {} same-origin links on {} ({} queued)",
                        links.len(),
                        url,
                        state.frontier_len()
                    );
                    pages.push(PageRecord {
                        url: url.clone(),
                        html,
                    });
                }
                Err(failure) => failures.push(failure),
            }

            last_reported = state.finish_visit(&url);
            progress.report(last_reported, label);
        };

        let final_fraction = state.complete();
        if final_fraction > last_reported {
            progress.report(final_fraction, label);
        }

        match &termination {
            Termination::FrontierExhausted => tracing::info!(
                "Crawl of {} completed: {} pages fetched, {} failed in {:?}",
                origin,
                pages.len(),
                failures.len(),
                start_time.elapsed()
            ),
            Termination::OutOfBound { url } => tracing::info!(
                "Crawl of {} stopped at out-of-bound URL {}: {} pages fetched, {} failed",
                origin,
                url,
                pages.len(),
                failures.len()
            ),
        }

        CrawlReport {
            origin: origin.to_string(),
            pages,
            failures,
            home_links: state.home_links().len(),
            termination,
            progress: final_fraction,
            elapsed: start_time.elapsed(),
        }
    }
}

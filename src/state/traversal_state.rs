//! Traversal state for a single crawl
//!
//! The crawl is a breadth-first walk bounded to the origin and the links found
//! on the origin's own page. The bound is checked when a URL is popped, not
//! when it is enqueued, and popping an out-of-bound URL ends the whole crawl.

use crate::state::progress::ProgressTracker;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub html: String,
}

/// The role a URL plays in the current crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// Not yet attempted (possibly queued in the frontier)
    Unvisited,

    /// Popped and currently being fetched
    Visiting,

    /// Attempted, whether the fetch succeeded or not
    Visited,
}

/// How a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every queued URL was handled
    FrontierExhausted,

    /// A popped URL was neither the origin nor one of its home links
    OutOfBound { url: String },
}

impl Termination {
    /// Returns true if the crawl was cut short by the bound check
    pub fn is_out_of_bound(&self) -> bool {
        matches!(self, Self::OutOfBound { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontierExhausted => write!(f, "frontier exhausted"),
            Self::OutOfBound { url } => write!(f, "aborted: out-of-bound URL {}", url),
        }
    }
}

/// The next thing the engine should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Fetch this URL
    Visit(String),

    /// Already visited; move on without fetching or reporting progress
    Skip(String),

    /// The crawl is over
    Stop(Termination),
}

/// Frontier, visited set, home link set, and progress of one crawl
#[derive(Debug, Clone)]
pub struct TraversalState {
    origin: String,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    home_links: BTreeSet<String>,
    current: Option<String>,
    progress: ProgressTracker,
}

impl TraversalState {
    /// Creates the initial state: frontier = [origin], nothing visited
    pub fn new(origin: impl Into<String>, min_progress_step: f64) -> Self {
        let origin = origin.into();
        Self {
            frontier: VecDeque::from([origin.clone()]),
            origin,
            visited: HashSet::new(),
            home_links: BTreeSet::new(),
            current: None,
            progress: ProgressTracker::new(min_progress_step),
        }
    }

    /// Pops the head of the frontier and decides what to do with it
    pub fn next_step(&mut self) -> Step {
        let Some(url) = self.frontier.pop_front() else {
            return Step::Stop(Termination::FrontierExhausted);
        };

        if url != self.origin && !self.home_links.contains(&url) {
            return Step::Stop(Termination::OutOfBound { url });
        }

        if self.visited.contains(&url) {
            return Step::Skip(url);
        }

        self.current = Some(url.clone());
        Step::Visit(url)
    }

    /// Records the links found on a successfully fetched page
    ///
    /// Links not yet visited are appended to the frontier in set order. When
    /// the page is the origin, its links become the home link set and fix the
    /// progress step.
    pub fn record_links(&mut self, url: &str, links: &BTreeSet<String>) {
        self.frontier.extend(
            links
                .iter()
                .filter(|link| !self.visited.contains(*link))
                .cloned(),
        );

        if url == self.origin {
            self.home_links = links.clone();
            self.progress.set_home_link_count(links.len());
        }
    }

    /// Finishes a visit attempt: advances progress and marks the URL visited
    ///
    /// Returns the progress fraction to report.
    pub fn finish_visit(&mut self, url: &str) -> f64 {
        let fraction = self.progress.advance();
        self.visited.insert(url.to_string());
        if self.current.as_deref() == Some(url) {
            self.current = None;
        }
        fraction
    }

    /// Marks the crawl finished and returns the final fraction (1.0)
    pub fn complete(&mut self) -> f64 {
        self.progress.complete()
    }

    /// Returns the role `url` plays right now
    pub fn visit_state(&self, url: &str) -> VisitState {
        if self.current.as_deref() == Some(url) {
            VisitState::Visiting
        } else if self.visited.contains(url) {
            VisitState::Visited
        } else {
            VisitState::Unvisited
        }
    }

    /// Links found on the origin's page; empty until it is fetched
    pub fn home_links(&self) -> &BTreeSet<String> {
        &self.home_links
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

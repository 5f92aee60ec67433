//! State module for tracking crawl progress
//!
//! This module provides the state held for the duration of one crawl.
//!
//! # Components
//!
//! - `TraversalState`: Frontier, visited set, and home link set of a single crawl
//! - `VisitState`: The role a URL currently plays (unvisited, visiting, visited)
//! - `Termination`: How a crawl ended (frontier exhausted or out-of-bound URL)
//! - `ProgressTracker` / `ProgressSink`: Progress accounting and its observer

mod progress;
mod traversal_state;

// Re-export main types
pub use progress::{NoProgress, ProgressSink, ProgressTracker, TracingProgress};
pub use traversal_state::{PageRecord, Step, Termination, TraversalState, VisitState};

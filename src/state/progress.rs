//! Progress accounting for a single crawl
//!
//! Every visit attempt advances the fraction by one step. The step is
//! `1 / |home links|` once the origin's page has been fetched, so visiting the
//! origin plus each of its links drives the fraction to 1.0.

/// Observer for crawl progress
///
/// Called synchronously after every visit attempt; implementations must return
/// quickly or they stall the crawl. Fractions are non-decreasing within a crawl.
pub trait ProgressSink {
    fn report(&mut self, fraction: f64, label: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(f64, &str),
{
    fn report(&mut self, fraction: f64, label: &str) {
        self(fraction, label)
    }
}

/// Sink that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64, _label: &str) {}
}

/// Sink that logs every update at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&mut self, fraction: f64, label: &str) {
        tracing::debug!("Progress {:.1}%: {}", fraction * 100.0, label);
    }
}

/// Accumulates per-visit progress steps
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    step: f64,
    total: f64,
    min_step: f64,
}

impl ProgressTracker {
    /// Creates a tracker with no step set yet
    ///
    /// Until the origin's page is fetched the step is zero, so a failed
    /// origin fetch reports 0.0.
    pub fn new(min_step: f64) -> Self {
        Self {
            step: 0.0,
            total: 0.0,
            min_step,
        }
    }

    /// Sets the step from the size of the home link set
    pub fn set_home_link_count(&mut self, count: usize) {
        self.step = if count == 0 {
            self.min_step
        } else {
            1.0 / count as f64
        };
    }

    /// Adds one step and returns the clamped fraction
    pub fn advance(&mut self) -> f64 {
        self.total += self.step;
        self.fraction()
    }

    /// Marks the crawl finished; the fraction is 1.0 from here on
    pub fn complete(&mut self) -> f64 {
        self.total = self.total.max(1.0);
        self.fraction()
    }

    /// Current fraction, clamped to at most 1.0
    pub fn fraction(&self) -> f64 {
        self.total.min(1.0)
    }
}

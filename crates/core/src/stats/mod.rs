use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Live counters shown next to the bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub comparisons: u64,
    /// Exchanges plus, for merge and insertion sort, element writes.
    pub swaps: u64,
    pub elapsed_ms: u64,
}

/// Owner of the run's [`Stats`]. Only the step sink mutates it.
#[derive(Debug, Default)]
pub struct Instrumentation {
    stats: Stats,
}

impl Instrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.stats = Stats::default();
    }

    pub fn record_comparison(&mut self) {
        self.stats.comparisons += 1;
    }

    pub fn record_swap(&mut self) {
        self.stats.swaps += 1;
    }

    /// Stamps the elapsed time and returns a copy for display.
    pub fn snapshot(&mut self, elapsed: Duration) -> Stats {
        self.stats.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.stats
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

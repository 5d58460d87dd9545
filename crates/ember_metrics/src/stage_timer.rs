//! Accumulated wall time per schedule stage

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulates how much wall time each labeled stage has consumed.
#[derive(Default)]
pub struct StageTimer {
    totals: HashMap<&'static str, Duration>,
}

impl StageTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` and charge its duration to `label`.
    pub fn time<R>(&mut self, label: &'static str, work: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = work();
        *self.totals.entry(label).or_default() += start.elapsed();
        result
    }

    pub fn total(&self, label: &str) -> Duration {
        self.totals.get(label).copied().unwrap_or(Duration::ZERO)
    }

    /// (label, accumulated) pairs, slowest first.
    pub fn report(&self) -> Vec<(&'static str, Duration)> {
        let mut entries: Vec<(&'static str, Duration)> =
            self.totals.iter().map(|(label, total)| (*label, *total)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    pub fn reset(&mut self) {
        self.totals.clear();
    }
}

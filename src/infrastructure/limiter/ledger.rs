use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use dashmap::DashMap;

use crate::entities::client::ClientKey;

/// Consistent view of one client's recent successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessSnapshot {
    pub recent_count: usize,
    pub burst_span: Option<Duration>,
}

/// Per-client success timestamps, oldest first.
///
/// Writes prune entries that fell out of the retention window. Reads skip
/// stale entries without touching the map, so a read never mutates.
#[derive(Debug)]
pub struct SuccessLedger {
    entries: DashMap<ClientKey, VecDeque<Instant>>,
    retention: Duration,
    min_burst_entries: usize,
}

impl SuccessLedger {
    pub fn new(retention: Duration, min_burst_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            retention,
            min_burst_entries,
        }
    }

    fn is_retained(&self, at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(at) < self.retention
    }

    /// Appends `now`, prunes, and returns how many successes remain.
    pub fn record_success(&self, key: &ClientKey, now: Instant) -> usize {
        let mut seq = self.entries.entry(key.clone()).or_default();
        seq.push_back(now);
        while let Some(&oldest) = seq.front() {
            if self.is_retained(oldest, now) {
                break;
            }
            seq.pop_front();
        }
        seq.len()
    }

    pub fn snapshot(&self, key: &ClientKey, now: Instant) -> SuccessSnapshot {
        let Some(seq) = self.entries.get(key) else {
            return SuccessSnapshot {
                recent_count: 0,
                burst_span: None,
            };
        };

        let retained: Vec<Instant> = seq
            .iter()
            .copied()
            .skip_while(|at| !self.is_retained(*at, now))
            .collect();

        let burst_span = match (retained.first(), retained.last()) {
            (Some(first), Some(last)) if retained.len() >= self.min_burst_entries => {
                Some(last.saturating_duration_since(*first))
            }
            _ => None,
        };

        SuccessSnapshot {
            recent_count: retained.len(),
            burst_span,
        }
    }

    pub fn recent_count(&self, key: &ClientKey, now: Instant) -> usize {
        self.snapshot(key, now).recent_count
    }

    pub fn burst_span(&self, key: &ClientKey, now: Instant) -> Option<Duration> {
        self.snapshot(key, now).burst_span
    }

    /// Raw stored length, stale entries included.
    pub fn stored_count(&self, key: &ClientKey) -> usize {
        self.entries.get(key).map_or(0, |seq| seq.len())
    }
}

/// Consecutive failed dispatches per client since its last success.
#[derive(Debug, Default)]
pub struct ErrorLedger {
    counts: DashMap<ClientKey, u32>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&self, key: &ClientKey) -> u32 {
        let mut count = self.counts.entry(key.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn record_success(&self, key: &ClientKey) {
        if let Some(mut count) = self.counts.get_mut(key) {
            *count = 0;
        }
    }

    pub fn consecutive_failures(&self, key: &ClientKey) -> u32 {
        self.counts.get(key).map_or(0, |count| *count)
    }
}

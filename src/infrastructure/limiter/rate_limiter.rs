use std::time::{Duration, Instant};
use dashmap::DashMap;

use crate::entities::client::ClientKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { remaining: u64 },
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }
}

/// Fixed window counter for a single client
#[derive(Debug)]
struct FixedWindow {
    window_start: Instant,
    count: u64,
}

impl FixedWindow {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.window_start)
    }

    /// Check and consume in one step. A denial leaves the count untouched.
    fn admit(&mut self, now: Instant, limit: u64, window_size: Duration) -> Admission {
        if self.elapsed(now) >= window_size {
            self.window_start = now;
            self.count = 0;
        }

        if self.count < limit {
            self.count += 1;
            Admission::Allowed { remaining: limit - self.count }
        } else {
            Admission::Denied {
                retry_after: window_size.saturating_sub(self.elapsed(now)),
            }
        }
    }
}

/// --- Per-client window store ---
/// The DashMap entry guard serializes check-and-consume for a key.
pub struct RateLimiterStore {
    windows: DashMap<ClientKey, FixedWindow>,
    limit: u64,
    window_size: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window_size,
        }
    }

    pub fn admit(&self, key: &ClientKey, now: Instant) -> Admission {
        if let Some(mut window) = self.windows.get_mut(key) {
            return window.admit(now, self.limit, self.window_size);
        }

        self.windows
            .entry(key.clone())
            .or_insert_with(|| FixedWindow::new(now))
            .admit(now, self.limit, self.window_size)
    }

    /// Drops windows that have fully elapsed; a fresh window behaves the same.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| window.elapsed(now) < self.window_size);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

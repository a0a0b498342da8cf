use std::{sync::Arc, time::Duration};

use crate::{
    entities::{client::ClientKey, outcome::AbuseVerdict},
    limiter::{
        ledger::{ErrorLedger, SuccessLedger, SuccessSnapshot},
        rate_limiter::{Admission, RateLimiterStore},
    },
    repositories::clock::Clock,
    settings::AbusePolicy,
};

/// Decision table applied when admission is denied.
///
/// | retained successes | burst span       | verdict   |
/// |--------------------|------------------|-----------|
/// | below minimum      | any              | Capped    |
/// | at least minimum   | below threshold  | Automated |
/// | at least minimum   | at or above      | Capped    |
pub fn classify(
    recent_count: usize,
    burst_span: Option<Duration>,
    policy: &AbusePolicy,
) -> AbuseVerdict {
    if recent_count < policy.burst_min_successes {
        return AbuseVerdict::Capped;
    }
    match burst_span {
        Some(span) if span < policy.burst_window => AbuseVerdict::Automated,
        _ => AbuseVerdict::Capped,
    }
}

/// Owns every piece of per-client state: admission windows plus the
/// success and error ledgers.
pub struct AbuseGuard {
    limiter: RateLimiterStore,
    successes: SuccessLedger,
    failures: ErrorLedger,
    policy: AbusePolicy,
    clock: Arc<dyn Clock>,
}

impl AbuseGuard {
    pub fn new(policy: AbusePolicy, clock: Arc<dyn Clock>) -> Self {
        AbuseGuard {
            limiter: RateLimiterStore::new(policy.admission_cap, policy.admission_window),
            successes: SuccessLedger::new(policy.success_retention, policy.burst_min_successes),
            failures: ErrorLedger::new(),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &AbusePolicy {
        &self.policy
    }

    pub fn admit(&self, client: &ClientKey) -> Admission {
        self.limiter.admit(client, self.clock.now())
    }

    /// Read-only: looks at the success ledger and never writes to it.
    pub fn classify_denial(&self, client: &ClientKey) -> AbuseVerdict {
        let snapshot = self.success_snapshot(client);
        classify(snapshot.recent_count, snapshot.burst_span, &self.policy)
    }

    pub fn success_snapshot(&self, client: &ClientKey) -> SuccessSnapshot {
        self.successes.snapshot(client, self.clock.now())
    }

    /// Returns the number of retained successes after recording this one.
    pub fn record_success(&self, client: &ClientKey) -> usize {
        let recent = self.successes.record_success(client, self.clock.now());
        self.failures.record_success(client);
        recent
    }

    pub fn record_failure(&self, client: &ClientKey) -> u32 {
        self.failures.record_failure(client)
    }

    pub fn consecutive_failures(&self, client: &ClientKey) -> u32 {
        self.failures.consecutive_failures(client)
    }

    pub fn purge_idle(&self) -> usize {
        self.limiter.purge_expired(self.clock.now())
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.tracked_clients()
    }
}

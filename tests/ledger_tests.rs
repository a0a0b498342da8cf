use std::time::{Duration, Instant};

use contact_intake::{
    entities::client::ClientKey,
    limiter::ledger::{ErrorLedger, SuccessLedger},
};

const RETENTION: Duration = Duration::from_secs(600);

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn burst_span_needs_three_entries() {
    let ledger = SuccessLedger::new(RETENTION, 3);
    let client = ClientKey::from("10.0.0.1");
    let t0 = Instant::now();

    ledger.record_success(&client, t0);
    ledger.record_success(&client, t0 + secs(4));
    assert_eq!(ledger.burst_span(&client, t0 + secs(4)), None);

    ledger.record_success(&client, t0 + secs(9));
    assert_eq!(ledger.recent_count(&client, t0 + secs(9)), 3);
    assert_eq!(ledger.burst_span(&client, t0 + secs(9)), Some(secs(9)));
}

#[test]
fn record_prunes_entries_past_retention() {
    let ledger = SuccessLedger::new(RETENTION, 3);
    let client = ClientKey::from("10.0.0.1");
    let t0 = Instant::now();

    ledger.record_success(&client, t0);
    ledger.record_success(&client, t0 + secs(100));
    let retained = ledger.record_success(&client, t0 + secs(650));

    assert_eq!(retained, 2);
    assert_eq!(ledger.stored_count(&client), 2);
}

#[test]
fn entry_exactly_at_retention_is_evicted() {
    let ledger = SuccessLedger::new(RETENTION, 3);
    let client = ClientKey::from("10.0.0.1");
    let t0 = Instant::now();

    ledger.record_success(&client, t0);
    let retained = ledger.record_success(&client, t0 + RETENTION);

    assert_eq!(retained, 1);
}

#[test]
fn reads_ignore_stale_entries_without_removing_them() {
    let ledger = SuccessLedger::new(RETENTION, 3);
    let client = ClientKey::from("10.0.0.1");
    let t0 = Instant::now();

    for i in 0..3 {
        ledger.record_success(&client, t0 + secs(i));
    }

    let later = t0 + secs(601);
    let snapshot = ledger.snapshot(&client, later);

    assert_eq!(snapshot.recent_count, 1);
    assert_eq!(snapshot.burst_span, None);
    assert_eq!(ledger.stored_count(&client), 3);
}

#[test]
fn unknown_client_has_empty_snapshot() {
    let ledger = SuccessLedger::new(RETENTION, 3);
    let snapshot = ledger.snapshot(&ClientKey::from("10.9.9.9"), Instant::now());

    assert_eq!(snapshot.recent_count, 0);
    assert_eq!(snapshot.burst_span, None);
}

#[test]
fn error_ledger_counts_consecutive_failures() {
    let ledger = ErrorLedger::new();
    let client = ClientKey::from("10.0.0.1");

    assert_eq!(ledger.record_failure(&client), 1);
    assert_eq!(ledger.record_failure(&client), 2);
    assert_eq!(ledger.consecutive_failures(&client), 2);

    ledger.record_success(&client);
    assert_eq!(ledger.consecutive_failures(&client), 0);
    assert_eq!(ledger.record_failure(&client), 1);
}

#[test]
fn error_ledger_keys_are_independent() {
    let ledger = ErrorLedger::new();
    let a = ClientKey::from("10.0.0.1");
    let b = ClientKey::from("10.0.0.2");

    ledger.record_failure(&a);
    ledger.record_failure(&a);
    ledger.record_success(&b);

    assert_eq!(ledger.consecutive_failures(&a), 2);
    assert_eq!(ledger.consecutive_failures(&b), 0);
}

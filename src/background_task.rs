use std::{sync::Arc, time::Duration};

use tokio::time::interval;

use crate::use_cases::abuse::AbuseGuard;

/// Evicts admission windows whose window has elapsed.
pub async fn start_purge_task(guard: Arc<AbuseGuard>, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let purged = guard.purge_idle();
        if purged > 0 {
            tracing::debug!(
                purged,
                remaining = guard.tracked_clients(),
                "Evicted idle admission windows"
            );
        }
    }
}

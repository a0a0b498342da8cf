use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use chrono::Utc;
use futures::FutureExt;
use uuid::Uuid;

use crate::{
    entities::{
        client::ClientKey,
        contact::ContactForm,
        notification::{ContactNotification, RequestMetadata},
        outcome::SubmissionReceipt,
    },
    errors::{ContactError, NotificationError},
    repositories::notifier::NotificationSender,
    use_cases::abuse::AbuseGuard,
    utils::timestamps::server_timestamps,
    validation::validate_contact_form,
};

pub struct ContactSubmissionHandler<N>
where
    N: NotificationSender,
{
    pub sender: N,
    guard: Arc<AbuseGuard>,
    dispatch_timeout: Duration,
}

impl<N> ContactSubmissionHandler<N>
where
    N: NotificationSender,
{
    pub fn new(sender: N, guard: Arc<AbuseGuard>, dispatch_timeout: Duration) -> Self {
        ContactSubmissionHandler {
            sender,
            guard,
            dispatch_timeout,
        }
    }

    pub fn guard(&self) -> &Arc<AbuseGuard> {
        &self.guard
    }

    /// Handles an admitted submission end to end.
    pub async fn submit(
        &self,
        client: &ClientKey,
        form: ContactForm,
        user_agent: String,
    ) -> Result<SubmissionReceipt, ContactError> {
        if form.is_honeypot_filled() {
            tracing::warn!(client = %client, "Honeypot triggered, discarding submission");
            return Ok(SubmissionReceipt::Discarded);
        }

        let record = validate_contact_form(&form)?;

        let stamps = server_timestamps(Utc::now());
        let meta = RequestMetadata {
            client_address: client.to_string(),
            user_agent,
            server_time_utc: stamps.utc,
            server_time_cst: stamps.cst,
            client_timezone: form.client_timezone,
            client_language: form.client_language,
            client_timestamp: form.client_timestamp_full,
        };
        let notification = ContactNotification::compose(&record, &meta);

        match self.dispatch(&notification).await {
            Ok(()) => {
                let reference = Uuid::new_v4();
                let recent = self.guard.record_success(client);
                tracing::info!(
                    client = %client,
                    %reference,
                    recent_successes = recent,
                    "Contact notification sent"
                );
                Ok(SubmissionReceipt::Sent { reference })
            }
            Err(e) => {
                let attempt = self.guard.record_failure(client);
                let max_attempts = self.guard.policy().max_consecutive_failures;
                tracing::error!(
                    client = %client,
                    attempt,
                    max_attempts,
                    "Contact notification failed: {}", e
                );
                Err(ContactError::DispatchFailed { attempt, max_attempts })
            }
        }
    }

    /// Timeouts and panics inside the sender count as ordinary failures.
    async fn dispatch(&self, notification: &ContactNotification) -> Result<(), NotificationError> {
        let send = AssertUnwindSafe(async { self.sender.send(notification).await }).catch_unwind();

        match tokio::time::timeout(self.dispatch_timeout, send).await {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(NotificationError::Panicked),
            Err(_elapsed) => Err(NotificationError::TimedOut(self.dispatch_timeout)),
        }
    }
}

use std::fmt;

use uuid::Uuid;

/// What happened to a submission that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionReceipt {
    /// Notification dispatched; the reference ties log lines together.
    Sent { reference: Uuid },
    /// Honeypot tripped. Answered like a success, nothing was sent.
    Discarded,
}

/// Verdict on a client that ran into the admission cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbuseVerdict {
    /// Ordinary user who reached the limit.
    Capped,
    /// Successes clustered tightly enough to look scripted.
    Automated,
}

impl fmt::Display for AbuseVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbuseVerdict::Capped => write!(f, "capped"),
            AbuseVerdict::Automated => write!(f, "automated"),
        }
    }
}

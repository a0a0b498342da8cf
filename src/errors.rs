use std::time::Duration;

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use serde::Serialize;

use crate::{entities::outcome::AbuseVerdict, handlers::fragments};

/// Failures surfaced to the person filling the form.
#[derive(Debug, Display)]
pub enum ContactError {
    #[display("Validation error: {_0}")]
    Validation(FieldError),

    #[display("Rate limited ({verdict}), retry after {retry_after:?}")]
    RateLimited {
        verdict: AbuseVerdict,
        retry_after: Duration,
        window: Duration,
    },

    #[display("Dispatch failed (attempt {attempt}/{max_attempts})")]
    DispatchFailed { attempt: u32, max_attempts: u32 },

    #[display("Unexpected fault: {_0}")]
    Unexpected(String),
}

impl ContactError {
    /// Past the failure threshold the form stops suggesting a retry.
    pub fn is_escalated(&self) -> bool {
        matches!(
            self,
            ContactError::DispatchFailed { attempt, max_attempts } if attempt >= max_attempts
        )
    }
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ContactError::Validation(field_error) => {
                fragments::validation_error(self.status_code(), &field_error.message)
            }
            ContactError::RateLimited { verdict, retry_after, window } => {
                let mut response = fragments::rate_limited(*verdict, *window);
                let secs = retry_after.as_secs().max(1);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, header::HeaderValue::from(secs));
                response
            }
            ContactError::DispatchFailed { attempt, max_attempts } => {
                if self.is_escalated() {
                    fragments::dispatch_unavailable()
                } else {
                    fragments::dispatch_retry(*attempt, *max_attempts)
                }
            }
            ContactError::Unexpected(_) => fragments::system_error(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::DispatchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldError> for ContactError {
    fn from(err: FieldError) -> Self {
        ContactError::Validation(err)
    }
}

/// Operator-facing reason a notification did not go out.
#[derive(Debug, Display)]
pub enum NotificationError {
    #[display("Sender misconfigured: {_0}")]
    Misconfigured(String),

    #[display("Transport error: {_0}")]
    Transport(String),

    #[display("Rejected by provider ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[display("Timed out after {_0:?}")]
    TimedOut(Duration),

    #[display("Sender panicked")]
    Panicked,
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[display("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

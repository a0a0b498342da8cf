use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::UrlencodedError,
};

use crate::handlers::fragments;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected form payload: {}", err);
        FormError::from(err).into()
    }));
}

/// Body that could not be decoded as a form at all.
#[derive(Debug)]
pub struct FormError {
    status: StatusCode,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid form payload ({})", self.status)
    }
}

impl ResponseError for FormError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        fragments::validation_error(self.status, "Datos inválidos en el formulario.")
    }
}

impl From<UrlencodedError> for FormError {
    fn from(err: UrlencodedError) -> Self {
        let status = match err {
            UrlencodedError::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        FormError { status }
    }
}

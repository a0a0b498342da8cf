use std::time::Duration;

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse,
};

use crate::entities::outcome::AbuseVerdict;

/// Header the htmx frontend listens on to reset the form.
pub const HX_TRIGGER: &str = "HX-Trigger";
pub const SENT_EVENT: &str = "form-sent-successfully";

const CHANNELS: &str = "<strong>WhatsApp</strong> o <strong>Correo Electrónico</strong>";

/// Wraps `inner` in the `#form-response` element the page swaps in.
fn fragment_body(class: &str, inner: &str) -> String {
    format!(r#"<div id="form-response" class="{class}">{inner}</div>"#)
}

pub fn html_fragment(status: StatusCode, class: &str, inner: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::html())
        .body(fragment_body(class, inner))
}

pub fn submission_sent() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .insert_header((HX_TRIGGER, SENT_EVENT))
        .body(fragment_body(
            "success",
            "<strong>¡Mensaje enviado!</strong> Te contactaremos pronto.",
        ))
}

pub fn validation_error(status: StatusCode, message: &str) -> HttpResponse {
    html_fragment(
        status,
        "warning",
        &format!("<strong>Error de validación:</strong> {message}"),
    )
}

pub fn dispatch_retry(attempt: u32, max_attempts: u32) -> HttpResponse {
    html_fragment(
        StatusCode::INTERNAL_SERVER_ERROR,
        "warning",
        &format!(
            "<strong>Error temporal en el servidor.</strong> Intenta nuevamente. (Intento {attempt}/{max_attempts})"
        ),
    )
}

pub fn dispatch_unavailable() -> HttpResponse {
    html_fragment(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error permanent",
        "<strong>No fue posible enviar tu información.</strong> Por favor, contáctanos por <strong>WhatsApp</strong> o por <strong>Correo Electrónico</strong>.",
    )
}

pub fn rate_limited(verdict: AbuseVerdict, window: Duration) -> HttpResponse {
    match verdict {
        AbuseVerdict::Automated => {
            let minutes = (window.as_secs() / 60).max(1);
            html_fragment(
                StatusCode::TOO_MANY_REQUESTS,
                "error permanent",
                &format!(
                    "<strong>Demasiados intentos.</strong> Por favor, espera {minutes} minutos o contáctanos por {CHANNELS}."
                ),
            )
        }
        AbuseVerdict::Capped => html_fragment(
            StatusCode::TOO_MANY_REQUESTS,
            "info permanent",
            &format!(
                "<strong>Tus mensajes han sido enviados.</strong> Por favor, espera respuesta o contáctanos por {CHANNELS}."
            ),
        ),
    }
}

pub fn system_error() -> HttpResponse {
    html_fragment(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error",
        "<strong>Error en el sistema.</strong> No fue posible enviar tu información. Por favor, contáctanos por WhatsApp o por correo electrónico.",
    )
}

use std::panic::AssertUnwindSafe;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use futures::FutureExt;

use crate::{
    constants::NOT_AVAILABLE,
    entities::{client::ClientKey, contact::ContactForm},
    errors::ContactError,
    handlers::fragments,
    AppState,
};

pub async fn submit_contact(
    state: web::Data<AppState>,
    client: ClientKey,
    req: HttpRequest,
    form: web::Form<ContactForm>,
) -> Result<HttpResponse, ContactError> {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let outcome = AssertUnwindSafe(
        state.contact_handler.submit(&client, form.into_inner(), user_agent),
    )
    .catch_unwind()
    .await;

    match outcome {
        Ok(result) => {
            result?;
            Ok(fragments::submission_sent())
        }
        Err(_panic) => {
            tracing::error!(client = %client, "Contact submission panicked");
            Err(ContactError::Unexpected("submission panicked".to_string()))
        }
    }
}

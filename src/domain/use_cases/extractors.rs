use actix_web::{web, FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};

use crate::{entities::client::ClientKey, utils::get_client_ip::get_client_ip, AppState};

/// Extractor for the caller's client key.
/// Reuses the key the admission gate stored on the request so both layers
/// agree on identity; resolves it from the connection otherwise.
impl FromRequest for ClientKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(key) = req.extensions().get::<ClientKey>() {
            return ready(Ok(key.clone()));
        }

        let trust_proxy = req
            .app_data::<web::Data<AppState>>()
            .is_some_and(|state| state.trust_x_forwarded_for);

        ready(Ok(get_client_ip(req, trust_proxy)))
    }
}

use actix_web::web;

use crate::{handlers::contact, middlewares::admission::AdmissionGate};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .wrap(AdmissionGate)
            .route(web::post().to(contact::submit_contact))
    );
}

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use humantime::format_duration;
use std::{rc::Rc, task::{Context, Poll}, time::Duration};

use crate::{
    errors::ContactError,
    limiter::rate_limiter::Admission,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Per-client admission check in front of the submission handler.
pub struct AdmissionGate;

impl<S> Transform<S, ServiceRequest> for AdmissionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AdmissionGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdmissionGateService {
            service: Rc::new(service),
        })
    }
}

pub struct AdmissionGateService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AdmissionGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Only submissions spend credits; preflights and 405s pass through
            if req.method() != Method::POST {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in admission gate");
                let fault = ContactError::Unexpected("application state unavailable".into());
                return Ok(req.into_response(fault.error_response()));
            };

            let client = get_client_ip(req.request(), state.trust_x_forwarded_for);
            let guard = state.contact_handler.guard();

            match guard.admit(&client) {
                Admission::Allowed { remaining } => {
                    tracing::debug!(client = %client, remaining, "Request admitted");
                    req.extensions_mut().insert(client);
                    service.call(req).await
                }
                Admission::Denied { retry_after } => {
                    let verdict = guard.classify_denial(&client);
                    tracing::warn!(
                        client = %client,
                        %verdict,
                        retry_after = %format_duration(Duration::from_secs(retry_after.as_secs())),
                        "Admission denied"
                    );
                    let denial = ContactError::RateLimited {
                        verdict,
                        retry_after,
                        window: guard.policy().admission_window,
                    };
                    Ok(req.into_response(denial.error_response()))
                }
            }
        })
    }
}

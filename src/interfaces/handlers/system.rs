use actix_web::{get, HttpResponse, Responder};

/// Liveness probe. Never touches shared state and is not rate limited.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

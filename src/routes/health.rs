use actix_web::{HttpResponse, get};
use chrono::Utc;

use crate::models::dto::HealthResponse;

/// GET /health - liveness (PUBLIC)
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok".to_string(),
        time: Utc::now(),
    })
}

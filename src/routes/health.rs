use actix_web::{web, HttpResponse, Responder};

use crate::models::HealthResponse;
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.records.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("{} store health check failed: {}", state.records.backend_name(), e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.records.backend_name().to_string(),
        cache: state.cache.stats(),
        timestamp: chrono::Utc::now(),
    })
}

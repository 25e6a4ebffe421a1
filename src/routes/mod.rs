// Route exports
pub mod bills;
pub mod health;
pub mod households;
pub mod notices;
pub mod posts;
pub mod reservations;
pub mod shopping_lists;
pub mod tasks;
pub mod users;

use actix_cors::Cors;
use actix_web::web;
use std::sync::Arc;
use validator::Validate;

use crate::config::FeedSettings;
use crate::error::{handle_json_payload_error, handle_query_payload_error, ApiError};
use crate::services::{CacheManager, Records};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub records: Records,
    pub cache: Arc<CacheManager>,
    pub feed: FeedSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .configure(health::configure)
            .configure(posts::configure)
            .configure(users::configure)
            .configure(households::configure)
            .configure(tasks::configure)
            .configure(shopping_lists::configure)
            .configure(bills::configure)
            .configure(notices::configure)
            .configure(reservations::configure),
    );
}

/// CORS policy for browser clients on any origin
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
}

/// Reject a request that fails its field validation with a fixed message
pub(crate) fn validate_request<T: Validate>(req: &T, message: &str) -> Result<(), ApiError> {
    req.validate().map_err(|errors| {
        tracing::info!("Validation failed: field_errors={:?}", errors);
        ApiError::bad_request(message)
    })
}

/// HouseholdID from the query string, falling back to the request body
pub(crate) fn require_household_id(
    query: Option<&str>,
    body: Option<&str>,
) -> Result<String, ApiError> {
    [query, body]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Missing HouseholdID"))
}

/// Non-empty value or `None`
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

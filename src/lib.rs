//! Flatchat API - household management and geofenced social feed
//!
//! Shared-living residents keep their user profile, household, cleaning rota,
//! shopping lists, bills, noticeboard and space reservations here. Posts on
//! the social feed carry a geofence and are only shown to readers inside it.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance::great_circle_distance, proximity::filter_visible};
pub use models::{FeedResponse, Post};
pub use routes::{configure_routes, AppState};

use serde::{Deserialize, Serialize};
use crate::models::domain::Post;
use crate::services::CacheStats;

/// Response for the proximity feed endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub message: String,
    pub posts: Vec<Post>,
}

impl FeedResponse {
    pub fn fetched(posts: Vec<Post>) -> Self {
        Self {
            message: "Posts fetched successfully".to_string(),
            posts,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

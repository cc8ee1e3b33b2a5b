use serde::{Deserialize, Serialize};

use crate::models::domain::{FeedSection, ScoredCandidate};

/// Response for the ranked feed endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub items: Vec<ScoredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the discover page
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub sections: Vec<FeedSection>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "cacheEntries")]
    pub cache_entries: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}

/// Onboarding completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingResponse {
    pub success: bool,
    #[serde(rename = "highTicketScore")]
    pub high_ticket_score: u32,
    /// Where the client should navigate next
    pub redirect: String,
}

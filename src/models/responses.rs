use serde::{Deserialize, Serialize};
use crate::models::domain::{Category, DirectoryEntry, MatchResult, Profile, Resource};

/// Top matches per category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRecommendations {
    pub top_grants: Vec<MatchResult>,
    pub top_incubators: Vec<MatchResult>,
    pub top_investors: Vec<MatchResult>,
}

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub profile: Profile,
    pub recommendations: TopRecommendations,
}

/// Response for both chat endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Filtered resources of one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub category: Category,
    pub total: usize,
    pub results: Vec<Resource>,
}

/// Filtered directory listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryListResponse {
    pub total: usize,
    pub results: Vec<DirectoryEntry>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

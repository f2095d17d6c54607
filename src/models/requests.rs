use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ChatMessage, Profile};

/// Request to rank resources for a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Request to the startup advisor chat
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Request to the directory advisor chat
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DirectoryChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Query string for browsing one resource category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQuery {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

fn default_category() -> String {
    "grants".to_string()
}

/// Query string for browsing the local directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, alias = "broad_type", rename = "broadType")]
    pub broad_type: Option<String>,
    #[serde(default)]
    pub equity: Option<String>,
}

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BroadType, Category, ChatMessage, ChatRole, DirectoryEntry, EquityCategory, MatchResult,
    Profile, Resource, ScoringWeights, Stage, SubRegion, ALL_SECTORS,
};
pub use requests::{ChatRequest, DirectoryChatRequest, DirectoryQuery, RecommendRequest, ResourceQuery};
pub use responses::{
    ChatResponse, DirectoryListResponse, ErrorResponse, HealthResponse, RecommendResponse,
    ResourceListResponse, TopRecommendations,
};

//! SEGPT - Resource matching and advisor service for Indian startups
//!
//! Scores grants, incubators and investors against a founder profile, serves
//! the explore and directory listings, and proxies advisor chat to an LLM
//! vendor with local fallbacks.

pub mod catalog;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::catalog::{Catalog, CatalogError};
pub use crate::core::{score_resource, Matcher, ResourceScore};
pub use crate::models::{MatchResult, Profile, Resource, ScoringWeights};
pub use crate::services::{ChatError, ChatProvider, ChatProxy, LlmProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let catalog = Catalog::bundled().unwrap();
        let profile = Profile {
            sector: Some("EdTech".to_string()),
            ..Default::default()
        };

        let result = Matcher::default().get_recommendations(&profile, &catalog);
        assert!(!result.top_grants.is_empty());
    }
}

use crate::catalog::Catalog;
use crate::core::scoring::{score_resource, ResourceScore};
use crate::models::{Category, MatchResult, Profile, Resource, ScoringWeights, TopRecommendations};

/// Default number of results kept per category
pub const DEFAULT_TOP_N: usize = 5;

/// Ranked output of the recommendation pipeline
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub top_grants: Vec<MatchResult>,
    pub top_incubators: Vec<MatchResult>,
    pub top_investors: Vec<MatchResult>,
    /// Every scored resource, best first
    pub all: Vec<MatchResult>,
}

impl Recommendations {
    pub fn into_top(self) -> TopRecommendations {
        TopRecommendations {
            top_grants: self.top_grants,
            top_incubators: self.top_incubators,
            top_investors: self.top_investors,
        }
    }
}

/// Scores the catalog against a profile and slices the best per category
///
/// # Pipeline Stages
/// 1. Score every grant, incubator and investor (dataset order)
/// 2. Stable sort by score, descending
/// 3. Keep the top N of each category
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    top_n: usize,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, top_n: usize) -> Self {
        Self { weights, top_n }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Score a single resource with this matcher's weights
    pub fn score(&self, resource: &Resource, profile: &Profile) -> ResourceScore {
        score_resource(resource, profile, &self.weights)
    }

    /// Rank every catalog resource for a profile
    pub fn get_recommendations(&self, profile: &Profile, catalog: &Catalog) -> Recommendations {
        self.recommend_top(profile, catalog, self.top_n)
    }

    /// Rank every catalog resource, keeping `limit` results per category
    pub fn recommend_top(&self, profile: &Profile, catalog: &Catalog, limit: usize) -> Recommendations {
        let mut scored: Vec<MatchResult> = catalog
            .resources()
            .map(|(category, resource)| {
                let ResourceScore { score, reasons } = self.score(resource, profile);
                MatchResult {
                    resource: resource.clone(),
                    category,
                    match_score: score,
                    match_reasons: reasons,
                }
            })
            .collect();

        // sort_by is stable, so equal scores keep dataset order
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        let top = |keep: fn(Category) -> bool| -> Vec<MatchResult> {
            scored
                .iter()
                .filter(|m| keep(m.category))
                .take(limit)
                .cloned()
                .collect()
        };

        let top_grants = top(|c| c == Category::Grant);
        let top_incubators = top(|c| matches!(c, Category::Incubator | Category::Accelerator));
        let top_investors = top(|c| c == Category::Investor);

        tracing::debug!(
            "Ranked {} resources (grants: {}, incubators: {}, investors: {})",
            scored.len(),
            top_grants.len(),
            top_incubators.len(),
            top_investors.len()
        );

        Recommendations {
            top_grants,
            top_incubators,
            top_investors,
            all: scored,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

// Core algorithm exports
pub mod classify;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use classify::{broad_type, classify_entry, equity_category, slugify, sub_region};
pub use filters::{filter_directory, filter_resources, matches_directory_filters, matches_explore_filters};
pub use matcher::{Matcher, Recommendations, DEFAULT_TOP_N};
pub use scoring::{score_resource, ResourceScore, MAX_SCORE};

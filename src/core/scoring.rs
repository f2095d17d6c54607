use crate::models::{Profile, Resource, ScoringWeights, Stage, ALL_SECTORS};

/// Highest score a resource can reach
pub const MAX_SCORE: u32 = 100;

/// Geography keywords that make a resource available to everyone
const OPEN_GEOGRAPHIES: [&str; 4] = ["pan india", "virtual", "global", "remote"];

/// Score and explanation for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScore {
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Calculate a match score (0-100) for a resource against a founder profile
///
/// Points are added per category and the total is clamped to 100:
/// ```text
/// sector      exact 35 | "All Sectors" 25 | related 20
/// stage       exact 30 | adjacent 15
/// geography   open (pan india, virtual, ...) 15 | local 20
/// team        student 15 | women 15 | research 10 | other 5
/// research    IP/research-based bonus 5
/// ```
/// Reasons are pushed in the order the rules fire.
pub fn score_resource(
    resource: &Resource,
    profile: &Profile,
    weights: &ScoringWeights,
) -> ResourceScore {
    let mut total = 0u32;
    let mut reasons = Vec::new();

    if let Some((points, reason)) = sector_points(resource, profile.sector(), weights) {
        total = total.saturating_add(points);
        reasons.push(reason);
    }

    if let Some((points, reason)) = stage_points(resource, profile.stage(), weights) {
        total = total.saturating_add(points);
        reasons.push(reason);
    }

    if let Some((points, reason)) = geography_points(resource, profile.geography(), weights) {
        total = total.saturating_add(points);
        reasons.push(reason);
    }

    if let Some((points, reason)) = team_points(resource, profile.team_background(), weights) {
        total = total.saturating_add(points);
        reasons.extend(reason);
    }

    if profile.research_based() && has_research_tags(resource) {
        total = total.saturating_add(weights.research_ip);
        reasons.push("Aligned with IP/Research-based innovations".to_string());
    }

    ResourceScore {
        score: total.min(MAX_SCORE) as u8,
        reasons,
    }
}

#[inline]
fn sector_points(resource: &Resource, sector: &str, weights: &ScoringWeights) -> Option<(u32, String)> {
    if sector.is_empty() {
        return None;
    }

    let wanted = sector.to_lowercase();
    let sectors: Vec<String> = resource
        .sectors
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if sectors.iter().any(|s| *s == wanted) {
        Some((weights.exact_sector, format!("Directly targets {} startups", sector)))
    } else if sectors.iter().any(|s| *s == ALL_SECTORS.to_lowercase()) {
        Some((weights.all_sectors, format!("Open to all sectors including {}", sector)))
    } else if sectors
        .iter()
        .any(|s| s.contains(wanted.as_str()) || wanted.contains(s.as_str()))
    {
        Some((weights.related_sector, format!("Related to your sector: {}", sector)))
    } else {
        None
    }
}

#[inline]
fn stage_points(resource: &Resource, stage: &str, weights: &ScoringWeights) -> Option<(u32, String)> {
    if stage.is_empty() || resource.stages.is_empty() {
        return None;
    }

    let wanted = stage.to_lowercase();
    if resource.stages.iter().any(|s| s.trim().to_lowercase() == wanted) {
        return Some((weights.exact_stage, format!("Accepts startups at {} stage", stage)));
    }

    // Partial credit for the neighbouring stage only
    let profile_stage = Stage::parse(stage)?;
    let closest = resource
        .stages
        .iter()
        .filter_map(|s| Stage::parse(s))
        .map(|s| s.distance(profile_stage))
        .min()?;

    (closest == 1).then(|| (weights.adjacent_stage, format!("Close to your stage ({})", stage)))
}

#[inline]
fn geography_points(resource: &Resource, geography: &str, weights: &ScoringWeights) -> Option<(u32, String)> {
    let region = resource.region().to_lowercase();
    if region.trim().is_empty() {
        return None;
    }

    if OPEN_GEOGRAPHIES.iter().any(|open| region.contains(open)) {
        Some((weights.open_geography, "Available across India / Globally".to_string()))
    } else if !geography.is_empty() && region.contains(&geography.to_lowercase()) {
        Some((weights.local_geography, format!("Based in your region: {}", geography)))
    } else {
        None
    }
}

/// Only the first matching background rule applies; the flat bonus carries no reason
#[inline]
fn team_points(
    resource: &Resource,
    team_background: &str,
    weights: &ScoringWeights,
) -> Option<(u32, Option<String>)> {
    let team = team_background.to_lowercase();
    if team.is_empty() {
        return None;
    }

    let eligibility = resource.eligibility.join(" ").to_lowercase();
    let tags = resource.tags.join(" ").to_lowercase();
    let mentions = |needle: &str| eligibility.contains(needle) || tags.contains(needle);

    if team.contains("student") && (mentions("student") || mentions("academic")) {
        Some((weights.student_team, Some("Supports student founders".to_string())))
    } else if team.contains("women") && mentions("women") {
        Some((weights.women_team, Some("Gives preference to women entrepreneurs".to_string())))
    } else if team.contains("research") && (tags.contains("research") || tags.contains("deep-tech")) {
        Some((
            weights.research_team,
            Some("Supports research-based / deep-tech startups".to_string()),
        ))
    } else if resource.has_match_attributes() {
        Some((weights.any_team, None))
    } else {
        None
    }
}

/// Research, deep-tech or IP tags; "ip" must be a whole word
fn has_research_tags(resource: &Resource) -> bool {
    resource.tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        tag.contains("research")
            || tag.contains("deep-tech")
            || tag.split(|c: char| !c.is_alphanumeric()).any(|word| word == "ip")
    })
}

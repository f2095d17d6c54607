use serde::{Deserialize, Serialize};

/// Sentinel sector value meaning a resource accepts every sector
pub const ALL_SECTORS: &str = "All Sectors";

/// Grant, incubator, accelerator or investor record from the bundled datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity: Option<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(rename = "stage", default)]
    pub stages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Resource {
    /// Geography string used for matching, falling back to location
    pub fn region(&self) -> &str {
        self.geography
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .or(self.location.as_deref())
            .unwrap_or("")
    }

    /// True when the record declares anything the scorer can match on
    pub fn has_match_attributes(&self) -> bool {
        !self.sectors.is_empty()
            || !self.stages.is_empty()
            || !self.region().trim().is_empty()
            || !self.eligibility.is_empty()
            || !self.tags.is_empty()
    }
}

/// Resource category as exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grant,
    Incubator,
    Accelerator,
    Investor,
}

impl Category {
    /// Category of a record from the incubator dataset
    pub fn for_incubator(resource: &Resource) -> Self {
        match resource.kind.as_deref() {
            Some(kind) if kind.to_lowercase().contains("accelerator") => Category::Accelerator,
            _ => Category::Incubator,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Grant => "grant",
            Category::Incubator => "incubator",
            Category::Accelerator => "accelerator",
            Category::Investor => "investor",
        }
    }
}

/// Startup stage in its fixed progression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Idea,
    #[serde(rename = "MVP")]
    Mvp,
    Revenue,
    Scaling,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Idea, Stage::Mvp, Stage::Revenue, Stage::Scaling];

    /// Case-insensitive parse; anything outside the fixed set has no stage
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "idea" => Some(Stage::Idea),
            "mvp" => Some(Stage::Mvp),
            "revenue" => Some(Stage::Revenue),
            "scaling" => Some(Stage::Scaling),
            _ => None,
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Ordinal distance between two stages
    pub fn distance(self, other: Stage) -> usize {
        self.ordinal().abs_diff(other.ordinal())
    }
}

/// Founder-entered startup profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub startup_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub team_background: Option<String>,
    #[serde(default)]
    pub geography: Option<String>,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub traction: Option<String>,
    #[serde(default)]
    pub is_research_based: Option<bool>,
}

impl Profile {
    pub fn sector(&self) -> &str {
        self.sector.as_deref().unwrap_or("").trim()
    }

    pub fn stage(&self) -> &str {
        self.stage.as_deref().unwrap_or("").trim()
    }

    pub fn team_background(&self) -> &str {
        self.team_background.as_deref().unwrap_or("").trim()
    }

    pub fn geography(&self) -> &str {
        self.geography.as_deref().unwrap_or("").trim()
    }

    /// Helper to get is_research_based as a bool, defaulting to false
    pub fn research_based(&self) -> bool {
        self.is_research_based.unwrap_or(false)
    }

    /// A profile is complete enough to rank against once it names a sector
    pub fn has_sector(&self) -> bool {
        !self.sector().is_empty()
    }
}

/// A resource annotated with its match score and reasons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub resource: Resource,
    pub category: Category,
    pub match_score: u8,
    pub match_reasons: Vec<String>,
}

/// Points awarded by each scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub exact_sector: u32,
    pub all_sectors: u32,
    pub related_sector: u32,
    pub exact_stage: u32,
    pub adjacent_stage: u32,
    pub open_geography: u32,
    pub local_geography: u32,
    pub student_team: u32,
    pub women_team: u32,
    pub research_team: u32,
    pub any_team: u32,
    pub research_ip: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_sector: 35,
            all_sectors: 25,
            related_sector: 20,
            exact_stage: 30,
            adjacent_stage: 15,
            open_geography: 15,
            local_geography: 20,
            student_team: 15,
            women_team: 15,
            research_team: 10,
            any_team: 5,
            research_ip: 5,
        }
    }
}

/// Mumbai sub-region a directory listing sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubRegion {
    #[serde(rename = "West Mumbai")]
    West,
    #[serde(rename = "East Mumbai")]
    East,
    #[serde(rename = "South Mumbai")]
    South,
    #[serde(rename = "Central Mumbai")]
    Central,
    #[serde(rename = "Navi Mumbai")]
    Navi,
    #[serde(rename = "Thane / MMR")]
    ThaneMmr,
    #[default]
    #[serde(rename = "Other Mumbai")]
    Other,
}

impl SubRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubRegion::West => "West Mumbai",
            SubRegion::East => "East Mumbai",
            SubRegion::South => "South Mumbai",
            SubRegion::Central => "Central Mumbai",
            SubRegion::Navi => "Navi Mumbai",
            SubRegion::ThaneMmr => "Thane / MMR",
            SubRegion::Other => "Other Mumbai",
        }
    }
}

/// Coarse ownership of a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BroadType {
    #[default]
    Private,
    #[serde(rename = "Government / Academic")]
    GovernmentAcademic,
}

impl BroadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadType::Private => "Private",
            BroadType::GovernmentAcademic => "Government / Academic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EquityCategory {
    #[serde(rename = "Zero Equity")]
    ZeroEquity,
    #[default]
    #[serde(rename = "Equity Taken")]
    EquityTaken,
}

impl EquityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquityCategory::ZeroEquity => "Zero Equity",
            EquityCategory::EquityTaken => "Equity Taken",
        }
    }
}

/// Startup space listing from the local directory
///
/// `id`, `sub_region`, `broad_type` and `equity_category` are derived when the
/// catalog loads; the raw dataset only carries the descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub contact_details: String,
    #[serde(default)]
    pub incubation_experience: String,
    #[serde(default)]
    pub last_five_incubations: String,
    #[serde(default)]
    pub equity_taken: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub funding_guarantee: String,
    #[serde(default)]
    pub investor_access: String,
    #[serde(default)]
    pub conf_hall_capacity: String,
    #[serde(default)]
    pub call_booths: String,
    #[serde(default)]
    pub seating_scalability: String,
    #[serde(default)]
    pub program_structure: String,
    #[serde(default)]
    pub brand_value: String,
    #[serde(default)]
    pub ideal_stage: String,
    #[serde(default)]
    pub founder_freedom: String,
    #[serde(default)]
    pub time_lock_in: String,
    #[serde(default)]
    pub sub_region: SubRegion,
    #[serde(default)]
    pub broad_type: BroadType,
    #[serde(default)]
    pub equity_category: EquityCategory,
}

/// Role of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    /// Any other role (e.g. Gemini's "model"); dropped from history
    #[serde(other)]
    Other,
}

/// Single turn of chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parse_is_case_insensitive() {
        assert_eq!(Stage::parse("mvp"), Some(Stage::Mvp));
        assert_eq!(Stage::parse(" Scaling "), Some(Stage::Scaling));
        assert_eq!(Stage::parse("Series A"), None);
    }

    #[test]
    fn test_stage_distance() {
        assert_eq!(Stage::Idea.distance(Stage::Mvp), 1);
        assert_eq!(Stage::Scaling.distance(Stage::Idea), 3);
        assert_eq!(Stage::Revenue.distance(Stage::Revenue), 0);
    }

    #[test]
    fn test_incubator_category_from_type() {
        let accelerator = Resource {
            kind: Some("Corporate Accelerator".to_string()),
            ..Default::default()
        };
        let incubator = Resource {
            kind: Some("Incubator".to_string()),
            ..Default::default()
        };
        assert_eq!(Category::for_incubator(&accelerator), Category::Accelerator);
        assert_eq!(Category::for_incubator(&incubator), Category::Incubator);
        assert_eq!(Category::for_incubator(&Resource::default()), Category::Incubator);
    }

    #[test]
    fn test_region_falls_back_to_location() {
        let resource = Resource {
            geography: Some("  ".to_string()),
            location: Some("Mumbai".to_string()),
            ..Default::default()
        };
        assert_eq!(resource.region(), "Mumbai");
    }

    #[test]
    fn test_profile_tolerates_nulls() {
        let profile: Profile = serde_json::from_str(
            r#"{"sector": null, "stage": "MVP", "isResearchBased": null}"#,
        )
        .unwrap();
        assert_eq!(profile.sector(), "");
        assert_eq!(profile.stage(), "MVP");
        assert!(!profile.research_based());
        assert!(!profile.has_sector());
    }

    #[test]
    fn test_match_result_serializes_flat() {
        let result = MatchResult {
            resource: Resource {
                id: "sisfs".to_string(),
                name: "Seed Fund".to_string(),
                stages: vec!["Idea".to_string()],
                ..Default::default()
            },
            category: Category::Grant,
            match_score: 60,
            match_reasons: vec!["Accepts startups at Idea stage".to_string()],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "Seed Fund");
        assert_eq!(json["stage"][0], "Idea");
        assert_eq!(json["category"], "grant");
        assert_eq!(json["matchScore"], 60);
    }

    #[test]
    fn test_unknown_chat_role_deserializes_as_other() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"model","content":"x"}"#).unwrap();
        assert_eq!(message.role, ChatRole::Other);

        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"y"}"#).unwrap();
        assert_eq!(message.role, ChatRole::Assistant);
    }
}

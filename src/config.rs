use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub chat: ChatSettings,
    pub scoring: ScoringSettings,
    pub recommend: RecommendSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Where the resource datasets come from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding grants/incubators/investors/directory JSON;
    /// the bundled copies are used when unset
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Nim,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NimSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for NimSettings {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            api_key: None,
            model: "meta/llama-3.1-8b-instruct".to_string(),
            max_tokens: 1024,
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub provider: ProviderKind,
    pub nim: NimSettings,
    pub gemini: GeminiSettings,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub history_window: usize,
    /// Ranked resources per category embedded in the advisor prompt
    pub context_per_category: usize,
    pub max_context_chars: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Nim,
            nim: NimSettings::default(),
            gemini: GeminiSettings::default(),
            timeout_secs: 9,
            max_retries: 2,
            retry_backoff_ms: 2000,
            history_window: 6,
            context_per_category: 8,
            max_context_chars: 6000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub weights: WeightsConfig,
}

/// Points per scoring rule, overridable from config
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
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

impl Default for WeightsConfig {
    fn default() -> Self {
        let w = ScoringWeights::default();
        Self {
            exact_sector: w.exact_sector,
            all_sectors: w.all_sectors,
            related_sector: w.related_sector,
            exact_stage: w.exact_stage,
            adjacent_stage: w.adjacent_stage,
            open_geography: w.open_geography,
            local_geography: w.local_geography,
            student_team: w.student_team,
            women_team: w.women_team,
            research_team: w.research_team,
            any_team: w.any_team,
            research_ip: w.research_ip,
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            exact_sector: config.exact_sector,
            all_sectors: config.all_sectors,
            related_sector: config.related_sector,
            exact_stage: config.exact_stage,
            adjacent_stage: config.adjacent_stage,
            open_geography: config.open_geography,
            local_geography: config.local_geography,
            student_team: config.student_team,
            women_team: config.women_team,
            research_team: config.research_team,
            any_team: config.any_team,
            research_ip: config.research_ip,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    pub top_n: usize,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("SEGPT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SEGPT__)
    /// 5. Vendor keys (NVIDIA_API_KEY, GEMINI_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SEGPT__CHAT__PROVIDER -> chat.provider
            .add_source(env_source())
            .build()?;

        apply_vendor_keys(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_vendor_keys(settings)?.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Honour the vendors' conventional key variables over config values
fn apply_vendor_keys(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(key) = env::var("NVIDIA_API_KEY") {
        builder = builder.set_override("chat.nim.api_key", key)?;
    }
    if let Ok(key) = env::var("GEMINI_API_KEY") {
        builder = builder.set_override("chat.gemini.api_key", key)?;
    }

    builder.build()
}

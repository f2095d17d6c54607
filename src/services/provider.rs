use crate::config::{ChatSettings, ProviderKind};
use crate::models::ChatMessage;
use crate::services::gemini::GeminiProvider;
use crate::services::nim::NimProvider;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling an LLM vendor
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Rate limited by {0}")]
    RateLimited(&'static str),

    #[error("API returned status {0}")]
    ApiError(u16),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("{0} is not set")]
    NotConfigured(&'static str),
}

/// Everything a vendor needs to produce one reply
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// A vendor chat-completion backend
pub trait ChatProvider: Send + Sync {
    /// Short vendor name for logs
    fn name(&self) -> &'static str;

    /// Environment variable holding the API key
    fn api_key_var(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    /// Send one prompt and return the vendor's reply text verbatim
    fn complete(&self, prompt: &ChatPrompt) -> impl Future<Output = Result<String, ChatError>> + Send;
}

/// Provider selected by configuration
pub enum LlmProvider {
    Nim(NimProvider),
    Gemini(GeminiProvider),
}

impl LlmProvider {
    pub fn from_settings(settings: &ChatSettings) -> Result<Self, ChatError> {
        Ok(match settings.provider {
            ProviderKind::Nim => LlmProvider::Nim(NimProvider::from_settings(&settings.nim)?),
            ProviderKind::Gemini => LlmProvider::Gemini(GeminiProvider::from_settings(&settings.gemini)?),
        })
    }
}

impl ChatProvider for LlmProvider {
    fn name(&self) -> &'static str {
        match self {
            LlmProvider::Nim(p) => p.name(),
            LlmProvider::Gemini(p) => p.name(),
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Nim(p) => p.api_key_var(),
            LlmProvider::Gemini(p) => p.api_key_var(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            LlmProvider::Nim(p) => p.is_configured(),
            LlmProvider::Gemini(p) => p.is_configured(),
        }
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        match self {
            LlmProvider::Nim(p) => p.complete(prompt).await,
            LlmProvider::Gemini(p) => p.complete(prompt).await,
        }
    }
}

/// Treat blank keys the same as missing ones
pub(crate) fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_key() {
        assert_eq!(usable_key(Some(" abc ".to_string())), Some("abc".to_string()));
        assert_eq!(usable_key(Some("   ".to_string())), None);
        assert_eq!(usable_key(None), None);
    }

    #[test]
    fn test_provider_from_settings() {
        let mut settings = ChatSettings::default();
        let provider = LlmProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "nvidia-nim");
        assert_eq!(provider.api_key_var(), "NVIDIA_API_KEY");

        settings.provider = ProviderKind::Gemini;
        settings.gemini.api_key = Some("key".to_string());
        let provider = LlmProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.is_configured());
    }
}

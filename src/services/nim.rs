use crate::config::NimSettings;
use crate::models::ChatRole;
use crate::services::provider::{usable_key, ChatError, ChatPrompt, ChatProvider};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible message
#[derive(Debug, Serialize)]
struct NimMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct NimRequest<'a> {
    model: &'a str,
    messages: Vec<NimMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct NimResponse {
    choices: Vec<NimChoice>,
}

#[derive(Debug, Deserialize)]
struct NimChoice {
    message: NimReply,
}

#[derive(Debug, Deserialize)]
struct NimReply {
    content: Option<String>,
}

/// NVIDIA NIM chat-completion client
///
/// Speaks the OpenAI-compatible `/chat/completions` protocol with bearer
/// authentication. The system prompt goes first, then the rolling history,
/// then the new user message.
pub struct NimProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    client: Client,
}

impl NimProvider {
    pub const API_KEY_VAR: &'static str = "NVIDIA_API_KEY";

    /// Create a new NIM client with default sampling
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Result<Self, ChatError> {
        let client = Client::builder().build()?;

        Ok(Self {
            base_url,
            api_key: usable_key(api_key),
            model,
            max_tokens: 1024,
            temperature: 0.1,
            top_p: 0.9,
            client,
        })
    }

    pub fn from_settings(settings: &NimSettings) -> Result<Self, ChatError> {
        Ok(Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
        )?
        .with_sampling(settings.max_tokens, settings.temperature, settings.top_p))
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32, top_p: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    fn build_request<'a>(&'a self, prompt: &'a ChatPrompt) -> NimRequest<'a> {
        let mut messages = Vec::with_capacity(prompt.history.len() + 2);
        messages.push(NimMessage { role: "system", content: &prompt.system });
        for turn in &prompt.history {
            let role = match turn.role {
                ChatRole::Assistant => "assistant",
                ChatRole::User => "user",
                ChatRole::System | ChatRole::Other => continue,
            };
            messages.push(NimMessage { role, content: &turn.content });
        }
        messages.push(NimMessage { role: "user", content: &prompt.message });

        NimRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

impl ChatProvider for NimProvider {
    fn name(&self) -> &'static str {
        "nvidia-nim"
    }

    fn api_key_var(&self) -> &'static str {
        Self::API_KEY_VAR
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ChatError::NotConfigured(Self::API_KEY_VAR))?;

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        tracing::debug!("Calling NIM model {} at {}", self.model, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited(self.name()));
        }
        if !status.is_success() {
            tracing::error!("NIM returned error status: {}", status);
            return Err(ChatError::ApiError(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: NimResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::InvalidResponse(format!("Failed to parse completion: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("Missing choices[0].message.content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;

    fn create_prompt() -> ChatPrompt {
        ChatPrompt {
            system: "You are SEGPT".to_string(),
            history: vec![
                ChatMessage::user("Hi"),
                ChatMessage { role: ChatRole::System, content: "ignored".to_string() },
                ChatMessage::assistant("Hello!"),
            ],
            message: "Which grants fit me?".to_string(),
        }
    }

    #[test]
    fn test_request_layout() {
        let provider = NimProvider::new(
            "https://nim.test/v1".to_string(),
            Some("key".to_string()),
            "meta/llama-3.1-8b-instruct".to_string(),
        )
        .unwrap();
        let prompt = create_prompt();

        let body = serde_json::to_value(provider.build_request(&prompt)).unwrap();
        let roles: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();

        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(body["model"], "meta/llama-3.1-8b-instruct");
        assert_eq!(body["messages"][3]["content"], "Which grants fit me?");
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Try **SISFS**"}}]}"#)
            .create_async()
            .await;

        let provider = NimProvider::new(server.url(), Some("key".to_string()), "m".to_string()).unwrap();
        let reply = provider.complete(&create_prompt()).await.unwrap();

        assert_eq!(reply, "Try **SISFS**");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_rate_limit_and_errors() {
        let mut server = mockito::Server::new_async().await;
        let _limited = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let provider = NimProvider::new(server.url(), Some("key".to_string()), "m".to_string()).unwrap();
        let err = provider.complete(&create_prompt()).await.unwrap_err();
        assert!(matches!(err, ChatError::RateLimited("nvidia-nim")));
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = NimProvider::new(server.url(), Some("key".to_string()), "m".to_string()).unwrap();
        let err = provider.complete(&create_prompt()).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = NimProvider::new("http://unused".to_string(), Some(" ".to_string()), "m".to_string()).unwrap();
        assert!(!provider.is_configured());

        let err = provider.complete(&create_prompt()).await.unwrap_err();
        assert!(matches!(err, ChatError::NotConfigured("NVIDIA_API_KEY")));
    }
}

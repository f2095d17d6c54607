use crate::config::GeminiSettings;
use crate::models::ChatRole;
use crate::services::provider::{usable_key, ChatError, ChatPrompt, ChatProvider};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Canned model turn that follows the system prompt in the seeded history
const PRIMER_REPLY: &str =
    "Ready to help! I have access to the full Indian startup ecosystem database.";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google Gemini `generateContent` client
///
/// Gemini has no system role in this conversation layout, so the system
/// prompt is sent as the opening user turn followed by a canned model
/// acknowledgement. History roles map `assistant` to `model`.
pub struct GeminiProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
    client: Client,
}

impl GeminiProvider {
    pub const API_KEY_VAR: &'static str = "GEMINI_API_KEY";

    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
    ) -> Result<Self, ChatError> {
        let client = Client::builder().build()?;

        Ok(Self {
            base_url,
            api_key: usable_key(api_key),
            model,
            max_output_tokens: 1024,
            temperature: 0.7,
            client,
        })
    }

    pub fn from_settings(settings: &GeminiSettings) -> Result<Self, ChatError> {
        let mut provider = Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
        )?;
        provider.max_output_tokens = settings.max_output_tokens;
        provider.temperature = settings.temperature;
        Ok(provider)
    }

    fn build_request<'a>(&self, prompt: &'a ChatPrompt) -> GenerateRequest<'a> {
        let mut contents = Vec::with_capacity(prompt.history.len() + 3);
        contents.push(Content { role: "user", parts: vec![Part { text: &prompt.system }] });
        contents.push(Content { role: "model", parts: vec![Part { text: PRIMER_REPLY }] });

        for turn in &prompt.history {
            let role = match turn.role {
                ChatRole::Assistant => "model",
                ChatRole::User => "user",
                ChatRole::System | ChatRole::Other => continue,
            };
            contents.push(Content { role, parts: vec![Part { text: &turn.content }] });
        }
        contents.push(Content { role: "user", parts: vec![Part { text: &prompt.message }] });

        GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            },
        }
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
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

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            urlencoding::encode(api_key)
        );

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Quota errors arrive as 429 or as a RESOURCE_EXHAUSTED error status
        let exhausted = !status.is_success() && body.contains("RESOURCE_EXHAUSTED");
        if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
            return Err(ChatError::RateLimited(self.name()));
        }
        if !status.is_success() {
            tracing::error!("Gemini returned error status: {}", status);
            return Err(ChatError::ApiError(status.as_u16()));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            ChatError::InvalidResponse(format!("Failed to parse generation: {}", e))
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ChatError::InvalidResponse(
                "Missing candidates[0].content.parts".into(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;

    fn create_prompt() -> ChatPrompt {
        ChatPrompt {
            system: "You are SEGPT".to_string(),
            history: vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")],
            message: "Any incubators in Pune?".to_string(),
        }
    }

    fn create_provider(base_url: String, api_key: &str) -> GeminiProvider {
        GeminiProvider::new(
            base_url,
            Some(api_key.to_string()),
            "gemini-2.0-flash".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_request_seeds_system_prompt() {
        let provider = create_provider("https://gemini.test".to_string(), "k");
        let prompt = create_prompt();

        let body = serde_json::to_value(provider.build_request(&prompt)).unwrap();
        let contents = body["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 5);
        assert_eq!(contents[0]["parts"][0]["text"], "You are SEGPT");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[3]["role"], "model");
        assert_eq!(contents[4]["parts"][0]["text"], "Any incubators in Pune?");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[tokio::test]
    async fn test_complete_joins_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "secret key".into()))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"Look at "},{"text":"SINE."}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = create_provider(server.url(), "secret key");
        let reply = provider.complete(&create_prompt()).await.unwrap();

        assert_eq!(reply, "Look at SINE.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resource_exhausted_is_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let provider = create_provider(server.url(), "k");
        let err = provider.complete(&create_prompt()).await.unwrap_err();

        assert!(matches!(err, ChatError::RateLimited("gemini")));
    }

    #[tokio::test]
    async fn test_success_mentioning_resource_exhausted_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"RESOURCE_EXHAUSTED: quota"}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = create_provider(server.url(), "k");
        let reply = provider.complete(&create_prompt()).await.unwrap();

        assert_eq!(reply, "RESOURCE_EXHAUSTED: quota");
    }

    #[tokio::test]
    async fn test_empty_candidates_are_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let provider = create_provider(server.url(), "k");
        let err = provider.complete(&create_prompt()).await.unwrap_err();

        assert!(matches!(err, ChatError::InvalidResponse(_)));
    }
}

use crate::catalog::Catalog;
use crate::config::ChatSettings;
use crate::core::Matcher;
use crate::models::{ChatMessage, Profile};
use crate::services::prompt::{self, ContextLimits};
use crate::services::provider::{ChatError, ChatPrompt, ChatProvider};
use std::sync::Arc;
use std::time::Duration;

/// Attempt budget for one chat request
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt, only for rate limits
    pub max_retries: u32,
    /// Base delay, multiplied by the retry number
    pub backoff: Duration,
    /// Bound on each individual attempt
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &ChatSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.retry_backoff_ms),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Wraps a vendor with prompt building, retries and local fallbacks
///
/// Callers always get a reply string back. Vendor failures degrade to canned
/// messages or to an answer generated from the catalog.
pub struct ChatProxy<P: ChatProvider> {
    provider: P,
    catalog: Arc<Catalog>,
    matcher: Matcher,
    policy: RetryPolicy,
    history_window: usize,
    context: ContextLimits,
}

impl<P: ChatProvider> ChatProxy<P> {
    pub fn new(
        provider: P,
        catalog: Arc<Catalog>,
        matcher: Matcher,
        settings: &ChatSettings,
    ) -> Self {
        Self {
            provider,
            catalog,
            matcher,
            policy: RetryPolicy::from_settings(settings),
            history_window: settings.history_window,
            context: ContextLimits {
                per_category: settings.context_per_category,
                max_chars: settings.max_context_chars,
            },
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Call the vendor, retrying rate limits with linear backoff
    async fn send(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.policy.backoff * attempt;
                tracing::info!(
                    "{} rate limited, retrying in {:?} (attempt {}/{})",
                    self.provider.name(),
                    delay,
                    attempt,
                    self.policy.max_retries
                );
                tokio::time::sleep(delay).await;
            }

            let attempt_result =
                tokio::time::timeout(self.policy.timeout, self.provider.complete(prompt)).await;
            let result = match attempt_result {
                Ok(result) => result,
                Err(_) => Err(ChatError::Timeout(self.policy.timeout)),
            };

            match result {
                Err(ChatError::RateLimited(_)) if attempt < self.policy.max_retries => attempt += 1,
                other => return other,
            }
        }
    }

    /// Answer a founder's question about grants, incubators and investors
    pub async fn advise(
        &self,
        message: &str,
        profile: Option<&Profile>,
        history: &[ChatMessage],
    ) -> String {
        if !self.provider.is_configured() {
            tracing::warn!(
                "{} is not set, answering from the local catalog",
                self.provider.api_key_var()
            );
            return format!(
                "{}\n\n{}",
                prompt::missing_key_warning(self.provider.api_key_var()),
                prompt::fallback_reply(message, profile, &self.catalog)
            );
        }

        let request = ChatPrompt {
            system: prompt::advisor_system_prompt(
                &self.catalog,
                &self.matcher,
                profile,
                self.context,
            ),
            history: prompt::recent_history(history, self.history_window),
            message: message.to_string(),
        };

        match self.send(&request).await {
            Ok(reply) => reply,
            Err(ChatError::RateLimited(vendor)) => {
                tracing::warn!(
                    "{} rate limit persisted after {} retries",
                    vendor,
                    self.policy.max_retries
                );
                prompt::RATE_LIMITED_REPLY.to_string()
            }
            Err(e) => {
                tracing::error!("Chat request failed, using fallback reply: {}", e);
                prompt::fallback_reply(message, profile, &self.catalog)
            }
        }
    }

    /// Answer a question strictly from the local startup-space directory
    pub async fn directory(&self, message: &str, history: &[ChatMessage]) -> String {
        if !self.provider.is_configured() {
            tracing::warn!(
                "{} is not set, directory chat unavailable",
                self.provider.api_key_var()
            );
            return prompt::missing_key_warning(self.provider.api_key_var());
        }

        let request = ChatPrompt {
            system: prompt::directory_system_prompt(&self.catalog, self.context.max_chars),
            history: prompt::recent_history(history, self.history_window),
            message: message.to_string(),
        };

        match self.send(&request).await {
            Ok(reply) => prompt::bold_to_html(&reply),
            Err(ChatError::RateLimited(_)) => prompt::failed_status_reply(429),
            Err(ChatError::ApiError(status)) => prompt::failed_status_reply(status),
            Err(ChatError::Timeout(_)) => prompt::TIMED_OUT_REPLY.to_string(),
            Err(e) => {
                tracing::error!("Directory chat failed: {}", e);
                prompt::DIRECTORY_UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::nim::NimProvider;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            backoff: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    fn create_proxy(base_url: String, api_key: Option<&str>) -> ChatProxy<NimProvider> {
        let provider =
            NimProvider::new(base_url, api_key.map(str::to_string), "m".to_string()).unwrap();
        let catalog = Arc::new(Catalog::bundled().unwrap());
        ChatProxy::new(provider, catalog, Matcher::default(), &ChatSettings::default())
            .with_policy(fast_policy())
    }

    #[test]
    fn test_policy_from_settings() {
        let policy = RetryPolicy::from_settings(&ChatSettings::default());
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.backoff, Duration::from_millis(2000));
        assert_eq!(policy.timeout, Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_advise_returns_vendor_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Apply to **SISFS**."}}]}"#)
            .create_async()
            .await;

        let proxy = create_proxy(server.url(), Some("key"));
        let reply = proxy.advise("Which grants?", None, &[]).await;

        assert_eq!(reply, "Apply to **SISFS**.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_then_canned() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .expect(3)
            .create_async()
            .await;

        let proxy = create_proxy(server.url(), Some("key"));
        let reply = proxy.advise("hello", None, &[]).await;

        assert_eq!(reply, prompt::RATE_LIMITED_REPLY);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let proxy = create_proxy(server.url(), Some("key"));
        let reply = proxy.advise("Any investors for me?", None, &[]).await;

        assert!(reply.starts_with("Here are some investors"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        // Accepted by the kernel backlog but never answered
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let proxy = create_proxy(url, Some("key"));
        let reply = proxy.advise("Show me incubators", None, &[]).await;
        assert!(reply.starts_with("Here are some top incubators"));

        let reply = proxy.directory("Spaces in Powai?", &[]).await;
        assert_eq!(reply, prompt::TIMED_OUT_REPLY);
        drop(listener);
    }

    #[tokio::test]
    async fn test_missing_key_warns_and_falls_back() {
        let proxy = create_proxy("http://unused".to_string(), None);

        let reply = proxy.advise("grant", None, &[]).await;
        assert!(reply.starts_with("⚠️ **AI Config Missing**: The `NVIDIA_API_KEY` is not set"));
        assert!(reply.contains("Here are some grants relevant to your **Idea** stage"));

        let reply = proxy.directory("hi", &[]).await;
        assert_eq!(reply, prompt::missing_key_warning("NVIDIA_API_KEY"));
    }

    #[tokio::test]
    async fn test_directory_converts_bold() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"content":"Try **SINE (IIT Bombay)** in Powai."}}]}"#,
            )
            .create_async()
            .await;

        let proxy = create_proxy(server.url(), Some("key"));
        let reply = proxy.directory("Deep-tech space in Powai?", &[]).await;

        assert_eq!(reply, "Try <strong>SINE (IIT Bombay)</strong> in Powai.");
    }

    #[tokio::test]
    async fn test_directory_failed_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .create_async()
            .await;

        let proxy = create_proxy(server.url(), Some("key"));
        let reply = proxy.directory("anything", &[]).await;

        assert_eq!(reply, "⚠️ **AI Call Failed (Status 503)**: Please try again later.");
    }
}

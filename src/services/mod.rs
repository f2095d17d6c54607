// Service exports
pub mod gemini;
pub mod nim;
pub mod prompt;
pub mod provider;
pub mod proxy;

pub use gemini::GeminiProvider;
pub use nim::NimProvider;
pub use provider::{ChatError, ChatPrompt, ChatProvider, LlmProvider};
pub use proxy::{ChatProxy, RetryPolicy};

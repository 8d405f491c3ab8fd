//! LLM provider adapters.
//!
//! Concrete implementations of the `LlmProvider` trait for:
//! - Google Gemini API (Gemini models)
//! - Anthropic Messages API (Claude models)
//! - OpenAI-compatible chat-completions APIs (OpenAI and Groq)
//!
//! Every adapter performs exactly one HTTP round trip per call and maps
//! failures to `LlmError`. Retry policy belongs to callers, not adapters.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatibleProvider;

use crate::error::LlmError;
use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client used by all adapters.
///
/// The request timeout covers the whole round trip; connecting gets a
/// fixed 10 second cap within it.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| LlmError::ApiRequest {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

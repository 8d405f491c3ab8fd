//! The uniform provider contract every LLM backend adapts to.
//!
//! Concrete adapters live in [`crate::providers`]; the orchestration layers
//! only ever see `Arc<dyn LlmProvider>`.

use crate::error::LlmError;
use crate::types::{CompletionRequest, RawCompletion, TokenUsage};
use async_trait::async_trait;
use std::time::Duration;

/// A single LLM backend behind the uniform call contract.
///
/// Adapters translate one [`CompletionRequest`] into one outbound request
/// and return the raw response. They apply the configured request timeout
/// and never retry internally; retry, if offered to the caller, is a fresh
/// orchestrator invocation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the prompt to the backend and return its raw response.
    async fn submit(&self, request: CompletionRequest) -> Result<RawCompletion, LlmError>;

    /// The model identifier this adapter speaks for.
    fn model_name(&self) -> &str;
}

/// A mock LLM provider for testing and development.
pub struct MockLlmProvider {
    model: String,
    responses: std::sync::Mutex<Vec<Result<RawCompletion, LlmError>>>,
    delay: Option<Duration>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: std::sync::Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a MockLlmProvider that always returns the given text.
    ///
    /// Queues multiple copies of the response so it can handle multiple calls.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue_response(Self::text_response(text));
        }
        provider
    }

    /// Create a MockLlmProvider whose next call fails with the given error.
    pub fn with_error(error: LlmError) -> Self {
        let provider = Self::new();
        provider.responses.lock().unwrap().push(Err(error));
        provider
    }

    /// Set the model name reported by this mock.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Delay every call by the given duration before responding.
    ///
    /// Used to exercise deadline handling in the orchestrator.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response to be returned by the next `submit` call.
    pub fn queue_response(&self, response: RawCompletion) {
        self.responses.lock().unwrap().push(Ok(response));
    }

    /// Queue an error to be returned by the next `submit` call.
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> RawCompletion {
        RawCompletion {
            text: text.to_string(),
            model: "mock-model".to_string(),
            usage: Some(TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            }),
        }
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn submit(&self, _request: CompletionRequest) -> Result<RawCompletion, LlmError> {
        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(Self::text_response(
                    "Mock response with no queued payload.",
                ))
            } else {
                responses.remove(0)
            }
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

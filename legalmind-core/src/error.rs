//! Error types for the LegalMind analysis core.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering provider, normalization, request-validation, and configuration
//! domains.

/// Top-level error type for the LegalMind core library.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Analysis timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Unknown model: {model}")]
    UnknownModel { model: String },
}

/// Errors from normalizing a raw provider payload into `AnalysisResult`.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Malformed analysis response: {message}")]
    Malformed { message: String },
}

/// A type alias for results using the top-level `AnalysisError`.
pub type Result<T> = std::result::Result<T, AnalysisError>;

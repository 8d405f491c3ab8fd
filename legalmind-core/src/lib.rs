//! # LegalMind Core
//!
//! Core library for the LegalMind multi-model legal document analysis
//! engine. Provides the provider adapters, prompt construction, response
//! normalization, the parallel comparison orchestrator, accuracy scoring,
//! and consensus detection.

pub mod analyzer;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod consensus;
pub mod error;
pub mod normalizer;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod scorer;
pub mod types;

// Re-export commonly used types at the crate root.
pub use analyzer::LegalAnalyzer;
pub use catalog::{ModelInfo, ProviderFamily, available_models, create_provider, key_available};
pub use comparison::{MAX_COMPARISON_MODELS, ModelComparator};
pub use config::{AnalysisConfig, AppConfig, ProviderConfig, ProvidersConfig, load_config};
pub use consensus::{detect_consensus, render_insights};
pub use error::{AnalysisError, LlmError, NormalizeError, Result};
pub use normalizer::normalize_analysis;
pub use prompt::{FOCUS_AREAS, build_analysis_prompt};
pub use provider::{LlmProvider, MockLlmProvider};
pub use scorer::{accuracy_score, score_results};
pub use types::{
    AccuracyScore, AnalysisDepth, AnalysisRequest, AnalysisResult, ComparisonResult,
    CompletionRequest, ConsensusIssue, Issue, ModelResult, RawCompletion, RiskLevel, TokenUsage,
};

//! Single-model analysis: one provider call end-to-end.
//!
//! Combines prompt construction, the provider call, normalization, and
//! timing into one unit of work. [`LegalAnalyzer::run_model`] is the unit
//! of concurrency the comparator fans out; it never propagates an error
//! upward.

use crate::catalog;
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::normalizer;
use crate::prompt;
use crate::provider::LlmProvider;
use crate::types::{AnalysisRequest, AnalysisResult, CompletionRequest, ModelResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs one model's analysis pipeline.
pub struct LegalAnalyzer {
    config: AppConfig,
}

impl LegalAnalyzer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Analyze a document with one model, returning the typed error on any
    /// failure. Backs the single-model analysis mode.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        model_id: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let provider = catalog::create_provider(model_id, &self.config)?;
        self.analyze_with_provider(provider, request).await
    }

    /// The full pipeline with an injected provider adapter.
    ///
    /// The timer spans the provider call and normalization; the resulting
    /// `response_time` and provider-reported `tokens_used` are attached to
    /// the analysis.
    pub async fn analyze_with_provider(
        &self,
        provider: Arc<dyn LlmProvider>,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let completion_request = CompletionRequest {
            prompt: prompt::build_analysis_prompt(request, self.config.analysis.max_document_chars),
            temperature: self.config.analysis.temperature,
            max_tokens: Some(self.config.analysis.max_output_tokens),
        };

        let started = Instant::now();
        let completion = provider.submit(completion_request).await?;
        let normalized = normalizer::normalize_analysis(&completion.text);
        let elapsed = started.elapsed();

        debug!(
            model = provider.model_name(),
            latency_ms = elapsed.as_millis() as u64,
            "Provider call completed"
        );

        let mut analysis = normalized?;
        analysis.response_time = Some(elapsed.as_secs_f64());
        analysis.tokens_used = completion.usage.map(|usage| usage.total());
        Ok(analysis)
    }

    /// The never-failing unit of concurrency: every failure mode from the
    /// adapter or the normalizer folds into the returned record's `error`
    /// field.
    pub async fn run_model(
        &self,
        provider: Arc<dyn LlmProvider>,
        request: &AnalysisRequest,
    ) -> ModelResult {
        let model_name = provider.model_name().to_string();
        match self.analyze_with_provider(provider, request).await {
            Ok(analysis) => {
                info!(
                    model = %model_name,
                    issues = analysis.issues.len(),
                    risk_score = analysis.overall_risk_score,
                    "Model analysis completed"
                );
                ModelResult::success(model_name, analysis)
            }
            Err(error) => {
                warn!(model = %model_name, error = %error, "Model analysis failed");
                ModelResult::failure(model_name, error.to_string())
            }
        }
    }
}

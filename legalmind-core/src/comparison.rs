//! Parallel multi-model comparison.
//!
//! Fans one analysis request out to up to four models concurrently and
//! collects per-model outcomes without fail-fast. A model that fails, however
//! it fails, occupies a failure slot; it never takes the others down.

use crate::analyzer::LegalAnalyzer;
use crate::catalog;
use crate::config::AppConfig;
use crate::consensus;
use crate::error::{AnalysisError, LlmError};
use crate::provider::LlmProvider;
use crate::types::{AnalysisRequest, ComparisonResult, ModelResult};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Upper bound on models in one comparison.
pub const MAX_COMPARISON_MODELS: usize = 4;

/// Orchestrates concurrent multi-model analyses of a single document.
pub struct ModelComparator {
    analyzer: Arc<LegalAnalyzer>,
}

impl ModelComparator {
    pub fn new(config: AppConfig) -> Self {
        Self {
            analyzer: Arc::new(LegalAnalyzer::new(config)),
        }
    }

    pub fn analyzer(&self) -> &LegalAnalyzer {
        &self.analyzer
    }

    /// Analyze one document with several models concurrently.
    ///
    /// The selection is validated before anything else happens; an invalid
    /// list returns `AnalysisError::InvalidRequest` with no provider built
    /// and no request sent. A model that fails routing or key resolution
    /// takes its failure slot without network traffic. Results come back in
    /// request order regardless of completion order.
    pub async fn compare_models(
        &self,
        request: &AnalysisRequest,
        models: &[String],
    ) -> Result<ComparisonResult, AnalysisError> {
        validate_model_selection(models)?;

        let config = self.analyzer.config();
        let providers: Vec<Result<Arc<dyn LlmProvider>, LlmError>> = models
            .iter()
            .map(|model| catalog::create_provider(model, config))
            .collect();

        self.run_comparison(models, providers, request).await
    }

    /// Comparison over caller-supplied adapters.
    ///
    /// Validation applies to the adapters' reported model names. This is the
    /// seam tests and embedders use to drive the orchestration with mock or
    /// pre-built providers.
    pub async fn compare_with_providers(
        &self,
        request: &AnalysisRequest,
        providers: Vec<Arc<dyn LlmProvider>>,
    ) -> Result<ComparisonResult, AnalysisError> {
        let models: Vec<String> = providers
            .iter()
            .map(|provider| provider.model_name().to_string())
            .collect();
        validate_model_selection(&models)?;

        let providers = providers.into_iter().map(Ok).collect();
        self.run_comparison(&models, providers, request).await
    }

    async fn run_comparison(
        &self,
        models: &[String],
        providers: Vec<Result<Arc<dyn LlmProvider>, LlmError>>,
        request: &AnalysisRequest,
    ) -> Result<ComparisonResult, AnalysisError> {
        let comparison_timeout =
            Duration::from_secs(self.analyzer.config().analysis.comparison_timeout_secs);
        let started = Instant::now();

        info!(models = ?models, "Starting model comparison");

        let tasks = providers.into_iter().enumerate().map(|(index, provider)| {
            let analyzer = Arc::clone(&self.analyzer);
            let model_name = models[index].clone();
            async move {
                let result = match provider {
                    Ok(provider) => {
                        let run = analyzer.run_model(provider, request);
                        match tokio::time::timeout(comparison_timeout, run).await {
                            Ok(result) => result,
                            Err(_) => {
                                warn!(
                                    model = %model_name,
                                    timeout_secs = comparison_timeout.as_secs(),
                                    "Model analysis hit the comparison deadline"
                                );
                                ModelResult::failure(
                                    model_name,
                                    AnalysisError::Timeout {
                                        timeout_secs: comparison_timeout.as_secs(),
                                    }
                                    .to_string(),
                                )
                            }
                        }
                    }
                    Err(error) => {
                        warn!(model = %model_name, error = %error, "Provider construction failed");
                        ModelResult::failure(model_name, error.to_string())
                    }
                };
                (index, result)
            }
        });

        // Indexed slots keep the output aligned with the request order even
        // though tasks finish in any order.
        let mut slots: Vec<Option<ModelResult>> = models.iter().map(|_| None).collect();
        for (index, result) in join_all(tasks).await {
            slots[index] = Some(result);
        }
        let model_results: Vec<ModelResult> = slots.into_iter().flatten().collect();

        let success_count = model_results.iter().filter(|r| r.is_success()).count();
        let consensus_insights = (success_count >= 2).then(|| {
            let clusters = consensus::detect_consensus(&model_results);
            consensus::render_insights(&clusters)
        });

        let response_time = started.elapsed().as_secs_f64();
        info!(
            total = model_results.len(),
            succeeded = success_count,
            elapsed_secs = response_time,
            "Comparison finished"
        );

        Ok(ComparisonResult {
            model_results,
            consensus_insights,
            response_time,
        })
    }
}

/// Reject empty, oversized, and duplicate model selections.
fn validate_model_selection(models: &[String]) -> Result<(), AnalysisError> {
    if models.is_empty() {
        return Err(AnalysisError::InvalidRequest {
            message: "at least one model is required for a comparison".to_string(),
        });
    }
    if models.len() > MAX_COMPARISON_MODELS {
        return Err(AnalysisError::InvalidRequest {
            message: format!(
                "at most {} models may be compared (got {})",
                MAX_COMPARISON_MODELS,
                models.len()
            ),
        });
    }
    let mut seen = HashSet::new();
    for model in models {
        if !seen.insert(model.as_str()) {
            return Err(AnalysisError::InvalidRequest {
                message: format!("duplicate model in selection: {}", model),
            });
        }
    }
    Ok(())
}

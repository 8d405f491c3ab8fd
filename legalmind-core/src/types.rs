//! Core types for analysis requests, provider completions, and results.

use serde::{Deserialize, Serialize};

/// Risk level assigned to an identified issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a provider-supplied risk level, tolerating case variations.
    ///
    /// Anything outside the known set normalizes to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "high" => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Analysis granularity requested by the caller.
///
/// Opaque to the orchestration core beyond prompt construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Comprehensive,
    Focused,
}

impl AnalysisDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "Quick",
            AnalysisDepth::Comprehensive => "Comprehensive",
            AnalysisDepth::Focused => "Focused",
        }
    }
}

impl std::fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single legal issue identified by a model.
///
/// Immutable once produced by normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Brief descriptive title of the issue.
    pub title: String,
    /// Detailed description of the legal concern.
    pub description: String,
    /// Primary legal category (e.g. "Contract Terms", "Liability").
    pub category: String,
    pub risk_level: RiskLevel,
    /// Model-reported confidence, clamped to [0, 1] by normalization.
    pub confidence: f64,
    pub potential_impact: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Relevant laws or regulations, when the model cites any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_citation: Option<String>,
    pub urgency: String,
}

/// The validated analysis produced by one successful model invocation.
///
/// Never mutated after creation; the scorer and consensus detector only
/// read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Document-level risk, clamped to [0, 10] by normalization.
    pub overall_risk_score: f64,
    pub document_type: String,
    #[serde(default)]
    pub compliance_flags: Vec<String>,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
    /// Total tokens reported by the provider, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    /// Wall-clock seconds for the provider call, attached by the analyzer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    /// Set when the provider omitted (or mangled) the overall risk score and
    /// normalization defaulted it to 0.
    #[serde(skip)]
    pub risk_score_defaulted: bool,
}

impl AnalysisResult {
    /// Average confidence across issues; 0 for an empty issue list.
    pub fn average_confidence(&self) -> f64 {
        if self.issues.is_empty() {
            return 0.0;
        }
        self.issues.iter().map(|i| i.confidence).sum::<f64>() / self.issues.len() as f64
    }
}

/// Outcome of one model's analysis: either a populated result or a failure
/// record. Exactly one of `analysis` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelResult {
    pub fn success(model_name: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            model_name: model_name.into(),
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failure(model_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            analysis: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Assembled outcome of a multi-model comparison.
///
/// `model_results` ordering follows the caller-supplied model list, not
/// completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub model_results: Vec<ModelResult>,
    /// Rendered summary of cross-model agreement; set only when at least two
    /// models succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_insights: Option<String>,
    /// Total wall-clock seconds for the whole comparison.
    pub response_time: f64,
}

impl ComparisonResult {
    pub fn success_count(&self) -> usize {
        self.model_results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.model_results.len() - self.success_count()
    }
}

/// Derived confidence proxy for one model's analysis. Advisory metadata
/// only; never affects which issues surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyScore {
    pub model_name: String,
    /// Score in [0, 100].
    pub score: f64,
}

/// A finding independently reported by two or more models, clustered as one
/// semantic item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusIssue {
    /// Representative issue: the highest-confidence member of the cluster.
    pub issue: Issue,
    /// Models that reported the finding, sorted and deduplicated.
    pub agreeing_models: Vec<String>,
    pub agreement_count: usize,
}

/// Caller-facing bundle describing what to analyze and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub document_text: String,
    #[serde(default)]
    pub depth: AnalysisDepth,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl AnalysisRequest {
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            depth: AnalysisDepth::default(),
            focus_areas: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: AnalysisDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_focus_areas(mut self, focus_areas: Vec<String>) -> Self {
        self.focus_areas = focus_areas;
        self
    }
}

/// One outbound request to a provider adapter. The prompt is an opaque,
/// already-constructed instruction string.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
}

/// Token usage reported by a provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Raw response from a provider adapter, before normalization.
#[derive(Debug, Clone)]
pub struct RawCompletion {
    /// Raw response text, expected (but not guaranteed) to be JSON-shaped.
    pub text: String,
    /// The model that produced the response.
    pub model: String,
    pub usage: Option<TokenUsage>,
}

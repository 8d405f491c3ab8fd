//! Accuracy scoring for completed analyses.
//!
//! The score is a derived 0-100 confidence proxy for one model's analysis,
//! not a ground-truth correctness measure. It is advisory metadata only and
//! never affects which issues surface.

use crate::types::{AccuracyScore, AnalysisResult, ModelResult};

/// Weight of the average issue confidence component.
const CONFIDENCE_WEIGHT: f64 = 0.5;
/// Weight of the issue-count component.
const ISSUE_COUNT_WEIGHT: f64 = 0.3;
/// Weight of the overall risk score component.
const RISK_SCORE_WEIGHT: f64 = 0.2;
/// Issue counts at or above this saturate the issue-count component.
const ISSUE_SATURATION: usize = 10;

/// Compute the accuracy score for one successful analysis.
///
/// Each component is normalized to 0-100 and clamped before weighting, so
/// the combined score stays within [0, 100] for any input.
pub fn accuracy_score(result: &AnalysisResult) -> f64 {
    let confidence_term = (result.average_confidence() * 100.0).clamp(0.0, 100.0);
    let issue_term = (result.issues.len().min(ISSUE_SATURATION) as f64 / ISSUE_SATURATION as f64
        * 100.0)
        .clamp(0.0, 100.0);
    let risk_term = (result.overall_risk_score / 10.0 * 100.0).clamp(0.0, 100.0);

    CONFIDENCE_WEIGHT * confidence_term
        + ISSUE_COUNT_WEIGHT * issue_term
        + RISK_SCORE_WEIGHT * risk_term
}

/// Score the successful subset of a comparison's results, in input order.
/// Failure records are skipped.
pub fn score_results(results: &[ModelResult]) -> Vec<AccuracyScore> {
    results
        .iter()
        .filter_map(|result| {
            result.analysis.as_ref().map(|analysis| AccuracyScore {
                model_name: result.model_name.clone(),
                score: accuracy_score(analysis),
            })
        })
        .collect()
}

//! Property-based tests for normalization, scoring, and consensus detection
//! using proptest.

use proptest::prelude::*;

use legalmind_core::consensus::detect_consensus;
use legalmind_core::normalizer::normalize_analysis;
use legalmind_core::scorer::accuracy_score;
use legalmind_core::types::{AnalysisResult, Issue, ModelResult, RiskLevel};

fn issue_with(confidence: f64) -> Issue {
    Issue {
        title: "Generated issue".into(),
        description: "A generated issue".into(),
        category: "General".into(),
        risk_level: RiskLevel::Medium,
        confidence,
        potential_impact: String::new(),
        recommendations: vec![],
        legal_citation: None,
        urgency: "Medium".into(),
    }
}

fn analysis_with(confidences: &[f64], risk: f64) -> AnalysisResult {
    AnalysisResult {
        issues: confidences.iter().copied().map(issue_with).collect(),
        overall_risk_score: risk,
        ..Default::default()
    }
}

/// Fixed issue templates for consensus generation. Identical text within a
/// template guarantees the pair clusters; templates 0 and 1 share a category
/// with disjoint wording to exercise the similarity check.
fn template_issue(index: usize, confidence: f64) -> Issue {
    let (title, description, category) = match index % 4 {
        0 => (
            "Unlimited liability exposure",
            "No cap on liability in the contract",
            "Liability",
        ),
        1 => (
            "One sided indemnification",
            "Vendor bears every defense obligation alone",
            "Liability",
        ),
        2 => (
            "Perpetual automatic renewal",
            "The term renews forever without notice",
            "Contract Terms",
        ),
        _ => (
            "Unbounded data retention",
            "Customer records are kept indefinitely",
            "Privacy & Data Protection",
        ),
    };
    Issue {
        title: title.into(),
        description: description.into(),
        category: category.into(),
        risk_level: RiskLevel::High,
        confidence,
        potential_impact: "Material exposure".into(),
        recommendations: vec![],
        legal_citation: None,
        urgency: "High".into(),
    }
}

fn results_from_picks(picks: &[Vec<(usize, f64)>]) -> Vec<ModelResult> {
    picks
        .iter()
        .enumerate()
        .map(|(model_index, selections)| {
            let issues = selections
                .iter()
                .map(|&(template, confidence)| template_issue(template, confidence))
                .collect();
            ModelResult::success(
                format!("model-{}", model_index),
                AnalysisResult {
                    issues,
                    overall_risk_score: 5.0,
                    ..Default::default()
                },
            )
        })
        .collect()
}

// --- Accuracy score properties ---

proptest! {
    #[test]
    fn score_stays_within_bounds(
        confidences in prop::collection::vec(-1000.0..1000.0f64, 0..30),
        risk in -1000.0..1000.0f64,
    ) {
        let score = accuracy_score(&analysis_with(&confidences, risk));
        prop_assert!((0.0..=100.0).contains(&score), "score out of bounds: {}", score);
    }

    #[test]
    fn score_never_drops_when_issues_are_added(
        confidence in 0.0..=1.0f64,
        risk in 0.0..=10.0f64,
        base in 0usize..15,
        extra in 1usize..15,
    ) {
        let fewer = analysis_with(&vec![confidence; base], risk);
        let more = analysis_with(&vec![confidence; base + extra], risk);
        prop_assert!(accuracy_score(&more) >= accuracy_score(&fewer));
    }

    #[test]
    fn score_saturates_beyond_ten_issues(
        confidence in 0.0..=1.0f64,
        risk in 0.0..=10.0f64,
        extra in 0usize..30,
    ) {
        let at_saturation = analysis_with(&vec![confidence; 10], risk);
        let beyond = analysis_with(&vec![confidence; 10 + extra], risk);
        let delta = (accuracy_score(&beyond) - accuracy_score(&at_saturation)).abs();
        prop_assert!(delta < 1e-9);
    }
}

// --- Normalization properties ---

proptest! {
    #[test]
    fn normalization_output_is_always_in_range(
        raw in any::<String>(),
    ) {
        // Arbitrary text either normalizes cleanly or fails; it never
        // produces out-of-range fields and never panics.
        if let Ok(analysis) = normalize_analysis(&raw) {
            prop_assert!((0.0..=10.0).contains(&analysis.overall_risk_score));
            for issue in &analysis.issues {
                prop_assert!((0.0..=1.0).contains(&issue.confidence));
            }
        }
    }

    #[test]
    fn normalization_clamps_wild_numeric_fields(
        confidence in -50.0..50.0f64,
        risk in -50.0..50.0f64,
        title in "[A-Za-z][A-Za-z ]{0,30}",
    ) {
        let payload = serde_json::json!({
            "issues": [{
                "title": title,
                "description": "generated",
                "category": "General",
                "risk_level": "High",
                "confidence": confidence,
            }],
            "overall_risk_score": risk,
        })
        .to_string();

        let analysis = normalize_analysis(&payload).unwrap();
        prop_assert!(!analysis.risk_score_defaulted);
        prop_assert!((0.0..=10.0).contains(&analysis.overall_risk_score));
        prop_assert_eq!(analysis.issues.len(), 1);
        prop_assert!((0.0..=1.0).contains(&analysis.issues[0].confidence));
    }

    #[test]
    fn missing_risk_score_defaults_to_zero_and_is_flagged(
        issue_count in 0usize..5,
    ) {
        let issues: Vec<serde_json::Value> = (0..issue_count)
            .map(|i| serde_json::json!({"title": format!("issue {}", i), "confidence": 0.5}))
            .collect();
        let payload = serde_json::json!({"issues": issues}).to_string();

        let analysis = normalize_analysis(&payload).unwrap();
        prop_assert_eq!(analysis.overall_risk_score, 0.0);
        prop_assert!(analysis.risk_score_defaulted);
        prop_assert_eq!(analysis.issues.len(), issue_count);
    }

    #[test]
    fn fenced_payload_normalizes_like_bare_payload(
        risk in 0.0..=10.0f64,
        confidence in 0.0..=1.0f64,
    ) {
        let body = serde_json::json!({
            "issues": [{"title": "Fence test", "confidence": confidence}],
            "overall_risk_score": risk,
        })
        .to_string();
        let fenced = format!("```json\n{}\n```", body);

        let bare = normalize_analysis(&body).unwrap();
        let wrapped = normalize_analysis(&fenced).unwrap();
        prop_assert_eq!(bare, wrapped);
    }

    #[test]
    fn normalized_payload_always_scores_in_bounds(
        confidence in -50.0..50.0f64,
        risk in -50.0..50.0f64,
    ) {
        let payload = serde_json::json!({
            "issues": [{"title": "Scored", "confidence": confidence}],
            "overall_risk_score": risk,
        })
        .to_string();

        let analysis = normalize_analysis(&payload).unwrap();
        let score = accuracy_score(&analysis);
        prop_assert!((0.0..=100.0).contains(&score));
    }
}

// --- Consensus properties ---

proptest! {
    #[test]
    fn consensus_is_independent_of_result_order(
        picks in prop::collection::vec(
            prop::collection::vec((0usize..4, 0.0..=1.0f64), 0..4),
            2..=4,
        ),
    ) {
        let results = results_from_picks(&picks);
        let mut reversed = results.clone();
        reversed.reverse();

        prop_assert_eq!(detect_consensus(&results), detect_consensus(&reversed));
    }

    #[test]
    fn consensus_clusters_always_have_two_or_more_distinct_models(
        picks in prop::collection::vec(
            prop::collection::vec((0usize..4, 0.0..=1.0f64), 0..4),
            2..=4,
        ),
    ) {
        let results = results_from_picks(&picks);
        let consensus = detect_consensus(&results);

        for cluster in &consensus {
            prop_assert!(cluster.agreement_count >= 2);
            prop_assert_eq!(cluster.agreement_count, cluster.agreeing_models.len());

            let mut sorted = cluster.agreeing_models.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&sorted, &cluster.agreeing_models);
        }

        // Agreement never increases down the ranked list.
        for pair in consensus.windows(2) {
            prop_assert!(pair[0].agreement_count >= pair[1].agreement_count);
        }
    }

    #[test]
    fn consensus_needs_at_least_two_successes(
        failures in 0usize..4,
        selections in prop::collection::vec((0usize..4, 0.0..=1.0f64), 0..4),
    ) {
        let mut results = results_from_picks(&[selections]);
        for i in 0..failures {
            results.push(ModelResult::failure(
                format!("failed-{}", i),
                "API request failed: connection refused",
            ));
        }

        prop_assert!(detect_consensus(&results).is_empty());
    }
}

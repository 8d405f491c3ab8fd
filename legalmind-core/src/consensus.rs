//! Cross-model consensus detection.
//!
//! Clusters issues that represent the same finding across two or more
//! successful analyses and ranks the clusters by agreement. Matching is
//! deliberately fuzzy: different models word the same finding differently,
//! so equality is category match plus token overlap, never exact strings.

use crate::types::{ConsensusIssue, Issue, ModelResult};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Minimum token-overlap (Jaccard) similarity between two issues' combined
/// title and description for them to count as the same finding, given a
/// matching category.
pub const SIMILARITY_THRESHOLD: f64 = 0.35;

/// How many clusters the rendered insights summary lists.
const INSIGHT_LIMIT: usize = 5;

struct Candidate<'a> {
    model: &'a str,
    issue: &'a Issue,
    tokens: HashSet<String>,
}

/// Detect consensus across the successful subset of `results`.
///
/// Returns clusters reported by at least two distinct models, ordered by
/// descending agreement count, ties broken by descending average cluster
/// confidence. Fewer than two successful results yield no consensus; a
/// finding reported twice by the same model does not count as agreement.
///
/// The clustering is symmetric and deterministic: candidates are put in
/// canonical order before greedy assignment, so permuting `results`
/// produces the same clusters.
pub fn detect_consensus(results: &[ModelResult]) -> Vec<ConsensusIssue> {
    let successes: Vec<&ModelResult> = results.iter().filter(|r| r.is_success()).collect();
    if successes.len() < 2 {
        debug!(
            successes = successes.len(),
            "Skipping consensus detection; need at least 2 successful results"
        );
        return Vec::new();
    }

    let mut candidates: Vec<Candidate<'_>> = successes
        .iter()
        .flat_map(|result| {
            let analysis = result.analysis.as_ref();
            analysis.into_iter().flat_map(|a| {
                a.issues.iter().map(|issue| Candidate {
                    model: result.model_name.as_str(),
                    issue,
                    tokens: token_set(issue),
                })
            })
        })
        .collect();

    // Canonical ordering makes greedy clustering independent of input order.
    candidates.sort_by(|a, b| {
        a.issue
            .category
            .cmp(&b.issue.category)
            .then_with(|| a.issue.title.cmp(&b.issue.title))
            .then_with(|| a.issue.description.cmp(&b.issue.description))
            .then_with(|| a.model.cmp(b.model))
    });

    let mut clusters: Vec<Vec<Candidate<'_>>> = Vec::new();
    for candidate in candidates {
        let slot = clusters.iter_mut().find(|cluster| {
            cluster
                .iter()
                .any(|member| same_finding(member, &candidate))
        });
        match slot {
            Some(cluster) => cluster.push(candidate),
            None => clusters.push(vec![candidate]),
        }
    }

    let mut ranked: Vec<(ConsensusIssue, f64)> = clusters
        .into_iter()
        .filter_map(|cluster| {
            let mut models: Vec<String> =
                cluster.iter().map(|c| c.model.to_string()).collect();
            models.sort();
            models.dedup();
            if models.len() < 2 {
                return None;
            }

            let average_confidence = cluster.iter().map(|c| c.issue.confidence).sum::<f64>()
                / cluster.len() as f64;

            // Representative: highest confidence, ties by title then
            // description ordering, independent of input order.
            let representative = cluster
                .iter()
                .max_by(|a, b| {
                    a.issue
                        .confidence
                        .partial_cmp(&b.issue.confidence)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| b.issue.title.cmp(&a.issue.title))
                        .then_with(|| b.issue.description.cmp(&a.issue.description))
                })
                .map(|c| c.issue.clone())?;

            let agreement_count = models.len();
            Some((
                ConsensusIssue {
                    issue: representative,
                    agreeing_models: models,
                    agreement_count,
                },
                average_confidence,
            ))
        })
        .collect();

    ranked.sort_by(|(a, a_conf), (b, b_conf)| {
        b.agreement_count
            .cmp(&a.agreement_count)
            .then_with(|| b_conf.partial_cmp(a_conf).unwrap_or(Ordering::Equal))
            .then_with(|| a.issue.title.cmp(&b.issue.title))
    });

    ranked.into_iter().map(|(issue, _)| issue).collect()
}

/// Render the deterministic consensus summary shown to callers.
pub fn render_insights(consensus: &[ConsensusIssue]) -> String {
    if consensus.is_empty() {
        return "No cross-model consensus: the models did not independently agree on any finding."
            .to_string();
    }

    let noun = if consensus.len() == 1 {
        "finding"
    } else {
        "findings"
    };
    let mut lines = vec![format!(
        "{} {} independently reported by multiple models:",
        consensus.len(),
        noun
    )];
    for item in consensus.iter().take(INSIGHT_LIMIT) {
        lines.push(format!(
            "- \"{}\" ({}, {} risk): flagged by {}",
            item.issue.title,
            item.issue.category,
            item.issue.risk_level,
            item.agreeing_models.join(", ")
        ));
    }
    if consensus.len() > INSIGHT_LIMIT {
        lines.push(format!(
            "... and {} more",
            consensus.len() - INSIGHT_LIMIT
        ));
    }
    lines.join("\n")
}

/// Two issues are the same finding iff their categories match (ASCII
/// case-insensitive) and their text similarity clears the threshold.
fn same_finding(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    a.issue.category.eq_ignore_ascii_case(&b.issue.category)
        && jaccard(&a.tokens, &b.tokens) >= SIMILARITY_THRESHOLD
}

/// Lowercased alphanumeric tokens of an issue's title and description.
fn token_set(issue: &Issue) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for text in [&issue.title, &issue.description] {
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if !token.is_empty() {
                tokens.insert(token.to_ascii_lowercase());
            }
        }
    }
    tokens
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

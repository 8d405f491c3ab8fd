//! Result normalization: coercing raw provider output into `AnalysisResult`.
//!
//! Providers are asked for strict JSON but are non-deterministic
//! generators: payloads arrive wrapped in markdown fences, with trailing
//! prose, missing fields, or wrong types. Normalization extracts what it
//! can and defaults the rest. Only a payload with no extractable JSON
//! object fails, with [`NormalizeError::Malformed`].

use crate::error::NormalizeError;
use crate::types::{AnalysisResult, Issue, RiskLevel};
use serde_json::{Map, Value};
use tracing::debug;

const DEFAULT_TITLE: &str = "Untitled Issue";
const DEFAULT_DESCRIPTION: &str = "No description provided";
const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_IMPACT: &str = "Impact assessment not provided";
const DEFAULT_URGENCY: &str = "Medium";
const DEFAULT_DOCUMENT_TYPE: &str = "Unknown";
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Normalize one raw provider payload into a validated `AnalysisResult`.
///
/// `tokens_used` and `response_time` are never read from the payload; the
/// analyzer attaches them afterwards.
pub fn normalize_analysis(raw: &str) -> Result<AnalysisResult, NormalizeError> {
    let payload = extract_json_object(raw)?;

    let (overall_risk_score, risk_score_defaulted) = match coerce_f64(payload.get("overall_risk_score")) {
        Some(score) => (score.clamp(0.0, 10.0), false),
        None => {
            debug!("Provider omitted overall_risk_score; defaulting to 0");
            (0.0, true)
        }
    };

    let issues = match payload.get("issues") {
        Some(Value::Array(entries)) => entries.iter().filter_map(normalize_issue).collect(),
        Some(other) => {
            debug!(kind = json_kind(other), "issues field is not an array; treating as empty");
            Vec::new()
        }
        None => Vec::new(),
    };

    Ok(AnalysisResult {
        issues,
        overall_risk_score,
        document_type: coerce_string(payload.get("document_type"))
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string()),
        compliance_flags: coerce_string_list(payload.get("compliance_flags")),
        positive_aspects: coerce_string_list(payload.get("positive_aspects")),
        tokens_used: None,
        response_time: None,
        risk_score_defaulted,
    })
}

/// Extract the JSON object from a raw response.
///
/// Tries the payload as-is (after stripping markdown code fences), then
/// falls back to the outermost brace-delimited substring, since models
/// often wrap the object in prose.
fn extract_json_object(raw: &str) -> Result<Map<String, Value>, NormalizeError> {
    let stripped = strip_code_fences(raw.trim());

    match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => {
            return Err(NormalizeError::Malformed {
                message: format!("payload is a JSON {}, not an object", json_kind(&other)),
            });
        }
        Err(_) => {}
    }

    if let (Some(start), Some(end)) = (stripped.find('{'), stripped.rfind('}'))
        && start < end
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&stripped[start..=end])
    {
        return Ok(map);
    }

    Err(NormalizeError::Malformed {
        message: "no extractable JSON object in provider response".to_string(),
    })
}

/// Strip a leading ```json (or bare ```) fence and its closing fence.
fn strip_code_fences(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Normalize one entry of the issues array. Non-object entries are dropped.
fn normalize_issue(value: &Value) -> Option<Issue> {
    let entry = match value.as_object() {
        Some(entry) => entry,
        None => {
            debug!(kind = json_kind(value), "Skipping non-object issue entry");
            return None;
        }
    };

    let confidence = coerce_f64(entry.get("confidence"))
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let risk_level = entry
        .get("risk_level")
        .and_then(Value::as_str)
        .map(RiskLevel::parse_lenient)
        .unwrap_or_default();

    Some(Issue {
        title: coerce_string(entry.get("title")).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: coerce_string(entry.get("description"))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        category: coerce_string(entry.get("category"))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        risk_level,
        confidence,
        potential_impact: coerce_string(entry.get("potential_impact"))
            .unwrap_or_else(|| DEFAULT_IMPACT.to_string()),
        recommendations: coerce_string_list(entry.get("recommendations")),
        legal_citation: coerce_string(entry.get("legal_citation")),
        urgency: coerce_string(entry.get("urgency")).unwrap_or_else(|| DEFAULT_URGENCY.to_string()),
    })
}

/// Coerce a value to f64, accepting numbers and numeric strings.
/// Non-finite results count as absent.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Coerce a value to a non-empty string. Numbers are stringified, matching
/// the loosest payloads seen in the wild; other types count as absent.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a value to a list of strings. A bare string or number becomes a
/// singleton list; anything else becomes empty.
fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| coerce_string(Some(entry)))
            .collect(),
        Some(Value::String(_)) | Some(Value::Number(_)) => {
            coerce_string(value).into_iter().collect()
        }
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

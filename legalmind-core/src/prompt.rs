//! Analysis prompt construction.
//!
//! Builds the instruction string sent to every provider: the document body
//! (truncated to the configured limit), depth-specific guidance, optional
//! focus areas, and the JSON response contract the normalizer expects.

use crate::types::{AnalysisDepth, AnalysisRequest};

/// Canonical legal focus areas callers may steer the analysis toward.
pub const FOCUS_AREAS: [&str; 8] = [
    "Contract Terms",
    "Compliance",
    "Liability",
    "Intellectual Property",
    "Employment Law",
    "Privacy & Data Protection",
    "Financial Terms",
    "Dispute Resolution",
];

/// JSON response contract appended to every analysis prompt. The normalizer
/// tolerates deviations, but providers are asked for exactly this shape.
const RESPONSE_FORMAT: &str = r#"
Respond with a JSON object in the following format:
{
    "issues": [
        {
            "title": "Brief descriptive title of the issue",
            "description": "Detailed description of the legal issue or concern",
            "category": "Primary legal category (Contract Terms, Compliance, Liability, etc.)",
            "risk_level": "High/Medium/Low",
            "confidence": 0.85,
            "potential_impact": "Description of potential consequences",
            "recommendations": ["Specific action item 1", "Specific action item 2"],
            "legal_citation": "Relevant laws or regulations if applicable",
            "urgency": "Immediate/High/Medium/Low"
        }
    ],
    "overall_risk_score": 7.5,
    "document_type": "Identified document type",
    "compliance_flags": ["List of potential compliance issues"],
    "positive_aspects": ["Well-drafted clauses or protective terms"]
}

Ensure all confidence scores are between 0.0 and 1.0, and the overall_risk_score is between 0 and 10.
"#;

const COMPREHENSIVE_INSTRUCTIONS: &str = "
Provide a thorough analysis including:
- Detailed examination of all clauses and terms
- Cross-referencing with relevant legal standards
- Potential edge cases and unusual scenarios
- Regulatory compliance considerations
";

const QUICK_INSTRUCTIONS: &str = "
Provide a focused analysis on:
- Most critical and obvious issues
- High-risk areas requiring immediate attention
- Major red flags and concerning clauses
";

const FOCUSED_INSTRUCTIONS: &str = "
Provide targeted analysis on:
- Issues specifically related to the selected focus areas
- Specialized legal concerns in those domains
- Industry-specific compliance requirements
";

/// Build the full analysis instruction string for one provider call.
///
/// Documents longer than `max_document_chars` are truncated with an
/// ellipsis marker so every provider sees the same bounded input.
pub fn build_analysis_prompt(request: &AnalysisRequest, max_document_chars: usize) -> String {
    let (document, truncated) = truncate_chars(&request.document_text, max_document_chars);
    let ellipsis = if truncated { "..." } else { "" };

    let mut prompt = format!(
        "\
You are an expert legal analyst tasked with analyzing a legal document for potential issues, risks, and areas of concern.

Document to analyze:
{document}{ellipsis}

Analysis Requirements:
- Identify specific legal issues, risks, and problematic clauses
- Categorize each issue into appropriate legal domains
- Assess risk levels (High, Medium, Low) for each issue
- Provide confidence scores (0.0 to 1.0) for each identified issue
- Give specific recommendations for addressing each issue
- Consider potential legal implications and consequences

Analysis Depth: {depth}
",
        depth = request.depth
    );

    if !request.focus_areas.is_empty() {
        prompt.push_str(&format!(
            "\nFocus Areas: Pay special attention to issues related to: {}\n",
            request.focus_areas.join(", ")
        ));
    }

    prompt.push_str(match request.depth {
        AnalysisDepth::Comprehensive => COMPREHENSIVE_INSTRUCTIONS,
        AnalysisDepth::Quick => QUICK_INSTRUCTIONS,
        AnalysisDepth::Focused => FOCUSED_INSTRUCTIONS,
    });

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_document_and_contract() {
        let request = AnalysisRequest::new("This agreement is made between parties A and B.");
        let prompt = build_analysis_prompt(&request, 8000);
        assert!(prompt.contains("This agreement is made between parties A and B."));
        assert!(prompt.contains("Respond with a JSON object"));
        assert!(prompt.contains("overall_risk_score"));
        assert!(prompt.contains("Analysis Depth: Comprehensive"));
    }

    #[test]
    fn test_prompt_depth_instructions() {
        let quick = AnalysisRequest::new("text").with_depth(AnalysisDepth::Quick);
        let prompt = build_analysis_prompt(&quick, 8000);
        assert!(prompt.contains("Major red flags"));
        assert!(!prompt.contains("Cross-referencing"));

        let focused = AnalysisRequest::new("text").with_depth(AnalysisDepth::Focused);
        let prompt = build_analysis_prompt(&focused, 8000);
        assert!(prompt.contains("selected focus areas"));
    }

    #[test]
    fn test_prompt_focus_areas_listed() {
        let request = AnalysisRequest::new("text")
            .with_focus_areas(vec!["Liability".into(), "Financial Terms".into()]);
        let prompt = build_analysis_prompt(&request, 8000);
        assert!(prompt.contains("Pay special attention to issues related to: Liability, Financial Terms"));

        let bare = AnalysisRequest::new("text");
        let prompt = build_analysis_prompt(&bare, 8000);
        assert!(!prompt.contains("Focus Areas:"));
    }

    #[test]
    fn test_document_truncation() {
        let long_text = "a".repeat(10_000);
        let request = AnalysisRequest::new(long_text);
        let prompt = build_analysis_prompt(&request, 8000);
        assert!(prompt.contains(&format!("{}...", "a".repeat(8000))));
        assert!(!prompt.contains(&"a".repeat(8001)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Multi-byte characters must not split
        let text = "§".repeat(100);
        let (cut, truncated) = truncate_chars(&text, 50);
        assert!(truncated);
        assert_eq!(cut.chars().count(), 50);

        let (whole, truncated) = truncate_chars("short", 8000);
        assert!(!truncated);
        assert_eq!(whole, "short");
    }
}

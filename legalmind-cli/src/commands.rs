//! CLI subcommand handlers and report rendering.

use crate::Commands;
use crate::ConfigAction;
use legalmind_core::comparison::ModelComparator;
use legalmind_core::prompt::FOCUS_AREAS;
use legalmind_core::scorer::{accuracy_score, score_results};
use legalmind_core::types::{AnalysisDepth, AnalysisRequest, AnalysisResult, ComparisonResult};
use legalmind_core::{
    AppConfig, LegalAnalyzer, ModelInfo, available_models, key_available, load_config,
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::warn;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            document,
            model,
            depth,
            focus,
            json,
        } => handle_analyze(&document, model, depth, focus, json, workspace).await,
        Commands::Compare {
            document,
            models,
            depth,
            focus,
            json,
        } => handle_compare(&document, &models, depth, focus, json, workspace).await,
        Commands::Models { available, json } => handle_models(available, json, workspace),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

async fn handle_analyze(
    document: &Path,
    model: Option<String>,
    depth: Option<String>,
    focus: Vec<String>,
    json: bool,
    workspace: &Path,
) -> anyhow::Result<()> {
    let config = load_config(Some(workspace), None)?;
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let model = model.unwrap_or_else(|| config.analysis.default_model.clone());
    let request = build_request(document, depth, focus).await?;

    let analyzer = LegalAnalyzer::new(config);
    let analysis = analyzer.analyze(&request, &model).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", render_analysis(&model, &analysis));
    }
    Ok(())
}

async fn handle_compare(
    document: &Path,
    models: &[String],
    depth: Option<String>,
    focus: Vec<String>,
    json: bool,
    workspace: &Path,
) -> anyhow::Result<()> {
    let config = load_config(Some(workspace), None)?;
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let request = build_request(document, depth, focus).await?;

    let comparator = ModelComparator::new(config);
    let comparison = comparator.compare_models(&request, models).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!("{}", render_comparison(&comparison));
    }
    Ok(())
}

fn handle_models(available_only: bool, json: bool, workspace: &Path) -> anyhow::Result<()> {
    let config = load_config(Some(workspace), None)?;
    let mut models = available_models();
    if available_only {
        models.retain(|model| key_available(model.family, &config));
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        println!("{}", render_models(&models, &config));
    }
    Ok(())
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".legalmind");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let default_config = legalmind_core::AppConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(workspace), None)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

/// Read the document and assemble the analysis request from CLI flags.
async fn build_request(
    document: &Path,
    depth: Option<String>,
    focus: Vec<String>,
) -> anyhow::Result<AnalysisRequest> {
    let text = tokio::fs::read_to_string(document)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read document '{}': {}", document.display(), e))?;
    if text.trim().is_empty() {
        anyhow::bail!("Document '{}' is empty", document.display());
    }

    for area in &focus {
        if !FOCUS_AREAS.contains(&area.as_str()) {
            warn!(
                "Focus area '{}' is not in the standard set; passing it through as-is",
                area
            );
        }
    }

    Ok(AnalysisRequest::new(text)
        .with_depth(parse_depth(depth.as_deref()))
        .with_focus_areas(focus))
}

fn parse_depth(value: Option<&str>) -> AnalysisDepth {
    match value {
        None => AnalysisDepth::default(),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "quick" => AnalysisDepth::Quick,
            "comprehensive" => AnalysisDepth::Comprehensive,
            "focused" => AnalysisDepth::Focused,
            other => {
                eprintln!(
                    "Unknown analysis depth: '{}'. Using 'comprehensive'.",
                    other
                );
                AnalysisDepth::Comprehensive
            }
        },
    }
}

fn render_analysis(model: &str, analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis by {}", model);
    let _ = writeln!(out, "Document type: {}", analysis.document_type);
    if analysis.risk_score_defaulted {
        let _ = writeln!(out, "Overall risk score: not reported (defaulted to 0)");
    } else {
        let _ = writeln!(
            out,
            "Overall risk score: {:.1}/10",
            analysis.overall_risk_score
        );
    }
    let _ = writeln!(out, "Accuracy estimate: {:.1}/100", accuracy_score(analysis));

    if analysis.issues.is_empty() {
        let _ = writeln!(out, "\nNo issues identified.");
    } else {
        let _ = writeln!(out, "\nIssues ({}):", analysis.issues.len());
        for (i, issue) in analysis.issues.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n  {}. [{}] {}  ({}, confidence {:.2})",
                i + 1,
                issue.risk_level,
                issue.title,
                issue.category,
                issue.confidence
            );
            let _ = writeln!(out, "     {}", issue.description);
            let _ = writeln!(out, "     Impact: {}", issue.potential_impact);
            if !issue.recommendations.is_empty() {
                let _ = writeln!(out, "     Recommendations:");
                for rec in &issue.recommendations {
                    let _ = writeln!(out, "       - {}", rec);
                }
            }
            if let Some(citation) = &issue.legal_citation {
                let _ = writeln!(out, "     Citation: {}", citation);
            }
        }
    }

    if !analysis.compliance_flags.is_empty() {
        let _ = writeln!(out, "\nCompliance flags:");
        for flag in &analysis.compliance_flags {
            let _ = writeln!(out, "  - {}", flag);
        }
    }
    if !analysis.positive_aspects.is_empty() {
        let _ = writeln!(out, "\nPositive aspects:");
        for aspect in &analysis.positive_aspects {
            let _ = writeln!(out, "  - {}", aspect);
        }
    }

    let mut footer = Vec::new();
    if let Some(tokens) = analysis.tokens_used {
        footer.push(format!("Tokens used: {}", tokens));
    }
    if let Some(seconds) = analysis.response_time {
        footer.push(format!("Response time: {:.2}s", seconds));
    }
    if !footer.is_empty() {
        let _ = writeln!(out, "\n{}", footer.join(" | "));
    }

    out
}

fn render_comparison(comparison: &ComparisonResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Compared {} model(s) in {:.2}s ({} succeeded, {} failed)\n",
        comparison.model_results.len(),
        comparison.response_time,
        comparison.success_count(),
        comparison.failure_count()
    );

    for result in &comparison.model_results {
        match &result.analysis {
            Some(analysis) => {
                let risk = if analysis.risk_score_defaulted {
                    "risk not reported".to_string()
                } else {
                    format!("risk {:.1}/10", analysis.overall_risk_score)
                };
                let _ = writeln!(
                    out,
                    "  {:<28} {} issue(s), {}",
                    result.model_name,
                    analysis.issues.len(),
                    risk
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {:<28} FAILED: {}",
                    result.model_name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    let mut scores = score_results(&comparison.model_results);
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if !scores.is_empty() {
        let _ = writeln!(out, "\nAccuracy ranking:");
        for (i, entry) in scores.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {:<28} {:.1}",
                i + 1,
                entry.model_name,
                entry.score
            );
        }
    }

    if let Some(insights) = &comparison.consensus_insights {
        let _ = writeln!(out, "\nConsensus:");
        for line in insights.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}

fn render_models(models: &[ModelInfo], config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Known models ({}):\n", models.len());
    let _ = writeln!(
        out,
        "  {:<28} {:<20} {:<10} {:>14}  {}",
        "ID", "Name", "Family", "Context window", "Key"
    );
    for model in models {
        let key = if key_available(model.family, config) {
            "ready"
        } else {
            "missing"
        };
        let _ = writeln!(
            out,
            "  {:<28} {:<20} {:<10} {:>14}  {}",
            model.id,
            model.name,
            model.family.to_string(),
            model.context_window,
            key
        );
    }
    out
}

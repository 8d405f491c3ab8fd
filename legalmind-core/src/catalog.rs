//! Model catalog and provider construction.
//!
//! Maps model identifiers to provider families and builds the right adapter
//! for each. Identifiers route by prefix, so dated and preview variants work
//! without their own catalog entries.

use crate::config::{AppConfig, ProviderConfig};
use crate::error::LlmError;
use crate::provider::LlmProvider;
use crate::providers::openai_compat::GROQ_BASE_URL;
use crate::providers::{AnthropicProvider, GeminiProvider, OpenAiCompatibleProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Model id prefixes served through Groq's OpenAI-compatible endpoint.
const GROQ_PREFIXES: [&str; 6] = ["llama", "mixtral", "mistral", "gemma", "qwen", "deepseek"];

/// The provider family a model identifier routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Gemini,
    OpenAi,
    Anthropic,
    Groq,
}

impl ProviderFamily {
    /// Route a model identifier to its provider family by prefix.
    ///
    /// Returns `LlmError::UnknownModel` when no family claims the prefix.
    pub fn for_model(model: &str) -> Result<Self, LlmError> {
        let id = model.to_lowercase();
        if id.starts_with("gemini-") {
            Ok(ProviderFamily::Gemini)
        } else if id.starts_with("gpt-")
            || id.starts_with("o1")
            || id.starts_with("o3")
            || id.starts_with("o4")
        {
            Ok(ProviderFamily::OpenAi)
        } else if id.starts_with("claude-") {
            Ok(ProviderFamily::Anthropic)
        } else if GROQ_PREFIXES.iter().any(|prefix| id.starts_with(prefix)) {
            Ok(ProviderFamily::Groq)
        } else {
            Err(LlmError::UnknownModel {
                model: model.to_string(),
            })
        }
    }
}

impl std::fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProviderFamily::Gemini => "Gemini",
            ProviderFamily::OpenAi => "OpenAI",
            ProviderFamily::Anthropic => "Anthropic",
            ProviderFamily::Groq => "Groq",
        };
        write!(f, "{}", label)
    }
}

/// Metadata about a single model in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// The model identifier (e.g. "gpt-4o", "claude-sonnet-4-20250514").
    pub id: &'static str,
    /// Human-readable model name.
    pub name: &'static str,
    pub family: ProviderFamily,
    /// Context window size in tokens.
    pub context_window: usize,
}

/// Models offered by default, spanning all four provider families.
///
/// Prefix routing accepts identifiers beyond this list; the catalog exists
/// for discovery, not gatekeeping.
pub fn available_models() -> Vec<ModelInfo> {
    let models_data = [
        (
            "gemini-2.5-pro",
            "Gemini 2.5 Pro",
            ProviderFamily::Gemini,
            1_048_576,
        ),
        (
            "gemini-2.5-flash",
            "Gemini 2.5 Flash",
            ProviderFamily::Gemini,
            1_048_576,
        ),
        (
            "gemini-2.0-flash",
            "Gemini 2.0 Flash",
            ProviderFamily::Gemini,
            1_048_576,
        ),
        (
            "gemini-1.5-pro",
            "Gemini 1.5 Pro",
            ProviderFamily::Gemini,
            2_097_152,
        ),
        ("gpt-4o", "GPT-4o", ProviderFamily::OpenAi, 128_000),
        ("gpt-4o-mini", "GPT-4o Mini", ProviderFamily::OpenAi, 128_000),
        ("gpt-4.1", "GPT-4.1", ProviderFamily::OpenAi, 1_047_576),
        ("o3-mini", "o3 Mini", ProviderFamily::OpenAi, 200_000),
        (
            "claude-sonnet-4-20250514",
            "Claude Sonnet 4",
            ProviderFamily::Anthropic,
            200_000,
        ),
        (
            "claude-3-5-sonnet-20241022",
            "Claude 3.5 Sonnet",
            ProviderFamily::Anthropic,
            200_000,
        ),
        (
            "claude-3-5-haiku-20241022",
            "Claude 3.5 Haiku",
            ProviderFamily::Anthropic,
            200_000,
        ),
        (
            "llama-3.3-70b-versatile",
            "Llama 3.3 70B",
            ProviderFamily::Groq,
            128_000,
        ),
        (
            "llama-3.1-8b-instant",
            "Llama 3.1 8B",
            ProviderFamily::Groq,
            128_000,
        ),
        (
            "mixtral-8x7b-32768",
            "Mixtral 8x7B",
            ProviderFamily::Groq,
            32_768,
        ),
    ];
    models_data
        .iter()
        .map(|(id, name, family, context_window)| ModelInfo {
            id,
            name,
            family: *family,
            context_window: *context_window,
        })
        .collect()
}

/// Build the adapter for a model identifier.
///
/// Routing failures surface as `LlmError::UnknownModel` and a missing API
/// key as `LlmError::AuthFailed`, both before any network traffic.
pub fn create_provider(
    model: &str,
    config: &AppConfig,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let family = ProviderFamily::for_model(model)?;
    let timeout = Duration::from_secs(config.analysis.request_timeout_secs);
    let provider_config = provider_section(config, family);
    let api_key = resolve_key(provider_config, family)?;

    match family {
        ProviderFamily::Gemini => Ok(Arc::new(GeminiProvider::new(
            model,
            api_key,
            provider_config.base_url.clone(),
            timeout,
        )?)),
        ProviderFamily::OpenAi => Ok(Arc::new(OpenAiCompatibleProvider::new(
            model,
            api_key,
            provider_config.base_url.clone(),
            timeout,
        )?)),
        ProviderFamily::Anthropic => Ok(Arc::new(AnthropicProvider::new(
            model,
            api_key,
            provider_config.base_url.clone(),
            timeout,
        )?)),
        ProviderFamily::Groq => {
            let base_url = provider_config
                .base_url
                .clone()
                .unwrap_or_else(|| GROQ_BASE_URL.to_string());
            Ok(Arc::new(OpenAiCompatibleProvider::new(
                model,
                api_key,
                Some(base_url),
                timeout,
            )?))
        }
    }
}

/// Whether a provider family's API key resolves from the config literal or
/// its environment variable. Used by the model listing to mark readiness.
pub fn key_available(family: ProviderFamily, config: &AppConfig) -> bool {
    provider_section(config, family).resolve_api_key().is_some()
}

fn provider_section(config: &AppConfig, family: ProviderFamily) -> &ProviderConfig {
    match family {
        ProviderFamily::Gemini => &config.providers.gemini,
        ProviderFamily::OpenAi => &config.providers.openai,
        ProviderFamily::Anthropic => &config.providers.anthropic,
        ProviderFamily::Groq => &config.providers.groq,
    }
}

fn resolve_key(
    provider_config: &ProviderConfig,
    family: ProviderFamily,
) -> Result<String, LlmError> {
    provider_config
        .resolve_api_key()
        .ok_or_else(|| LlmError::AuthFailed {
            provider: format!(
                "{} (env var '{}' not set)",
                family, provider_config.api_key_env
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_model_routes_each_family() {
        assert_eq!(
            ProviderFamily::for_model("gemini-2.0-flash").unwrap(),
            ProviderFamily::Gemini
        );
        assert_eq!(
            ProviderFamily::for_model("gpt-4o-mini").unwrap(),
            ProviderFamily::OpenAi
        );
        assert_eq!(
            ProviderFamily::for_model("o3-mini").unwrap(),
            ProviderFamily::OpenAi
        );
        assert_eq!(
            ProviderFamily::for_model("claude-sonnet-4-20250514").unwrap(),
            ProviderFamily::Anthropic
        );
        assert_eq!(
            ProviderFamily::for_model("llama-3.3-70b-versatile").unwrap(),
            ProviderFamily::Groq
        );
        assert_eq!(
            ProviderFamily::for_model("mixtral-8x7b-32768").unwrap(),
            ProviderFamily::Groq
        );
    }

    #[test]
    fn test_for_model_is_case_insensitive() {
        assert_eq!(
            ProviderFamily::for_model("Gemini-2.0-Flash").unwrap(),
            ProviderFamily::Gemini
        );
    }

    #[test]
    fn test_for_model_accepts_unlisted_variants() {
        // Preview and dated ids route on prefix without a catalog entry.
        assert_eq!(
            ProviderFamily::for_model("gemini-3-flash-preview").unwrap(),
            ProviderFamily::Gemini
        );
        assert_eq!(
            ProviderFamily::for_model("gpt-5-turbo-2026-01-01").unwrap(),
            ProviderFamily::OpenAi
        );
    }

    #[test]
    fn test_for_model_rejects_unknown() {
        let err = ProviderFamily::for_model("totally-made-up").unwrap_err();
        assert!(matches!(err, LlmError::UnknownModel { .. }));
        assert_eq!(err.to_string(), "Unknown model: totally-made-up");
    }

    #[test]
    fn test_available_models_route_to_their_family() {
        let models = available_models();
        assert!(models.len() >= 12);
        for model in &models {
            assert_eq!(
                ProviderFamily::for_model(model.id).unwrap(),
                model.family,
                "{} should route to {:?}",
                model.id,
                model.family
            );
        }
    }

    #[test]
    fn test_create_provider_with_configured_key() {
        let mut config = AppConfig::default();
        config.providers.anthropic.api_key = Some("test-key".to_string());
        let provider = create_provider("claude-3-5-haiku-20241022", &config).unwrap();
        assert_eq!(provider.model_name(), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_create_provider_groq_with_configured_key() {
        let mut config = AppConfig::default();
        config.providers.groq.api_key = Some("test-key".to_string());
        let provider = create_provider("llama-3.1-8b-instant", &config).unwrap();
        assert_eq!(provider.model_name(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_create_provider_missing_key() {
        let mut config = AppConfig::default();
        config.providers.gemini.api_key = None;
        config.providers.gemini.api_key_env = "LEGALMIND_TEST_UNSET_GEMINI_KEY".to_string();
        let err = create_provider("gemini-2.0-flash", &config).err().unwrap();
        match err {
            LlmError::AuthFailed { provider } => {
                assert!(provider.contains("LEGALMIND_TEST_UNSET_GEMINI_KEY"));
                assert!(provider.contains("Gemini"));
            }
            other => panic!("Expected AuthFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_create_provider_unknown_model() {
        let config = AppConfig::default();
        let err = create_provider("banana-9000", &config).err().unwrap();
        assert!(matches!(err, LlmError::UnknownModel { .. }));
    }

    #[test]
    fn test_key_available_tracks_resolution() {
        let mut config = AppConfig::default();
        config.providers.anthropic.api_key = Some("test-key".to_string());
        config.providers.gemini.api_key = None;
        config.providers.gemini.api_key_env = "LEGALMIND_TEST_UNSET_GEMINI_KEY".to_string();
        assert!(key_available(ProviderFamily::Anthropic, &config));
        assert!(!key_available(ProviderFamily::Gemini, &config));
    }

    #[test]
    fn test_family_display() {
        assert_eq!(ProviderFamily::Gemini.to_string(), "Gemini");
        assert_eq!(ProviderFamily::OpenAi.to_string(), "OpenAI");
        assert_eq!(ProviderFamily::Groq.to_string(), "Groq");
    }
}

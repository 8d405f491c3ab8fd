//! Configuration system for LegalMind.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/legalmind/config.toml` and/or
//! `.legalmind/config.toml` in the workspace directory.

use crate::error::AnalysisError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the LegalMind analysis engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Validate the whole configuration and return any warnings.
    ///
    /// Returns human-readable warning messages for problematic values
    /// (does not error; the engine still runs with what it was given).
    pub fn validate(&self) -> Vec<String> {
        self.analysis.validate()
    }
}

/// Tuning for analysis requests and comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Per-provider request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Global deadline for a whole comparison in seconds.
    pub comparison_timeout_secs: u64,
    /// Sampling temperature sent to providers.
    pub temperature: f32,
    /// Maximum tokens a provider may generate for one analysis.
    pub max_output_tokens: usize,
    /// Documents longer than this are truncated before prompting.
    pub max_document_chars: usize,
    /// Model used when the caller does not pick one.
    pub default_model: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            comparison_timeout_secs: 120,
            temperature: 0.3,
            max_output_tokens: 4096,
            max_document_chars: 8000,
            default_model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Validate this section and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.request_timeout_secs == 0 {
            warnings.push("request_timeout_secs is 0; every provider call will time out".into());
        }
        if self.comparison_timeout_secs < self.request_timeout_secs {
            warnings.push(format!(
                "comparison_timeout_secs ({}) < request_timeout_secs ({}); requests may be cut off by the comparison deadline",
                self.comparison_timeout_secs, self.request_timeout_secs
            ));
        }
        if self.temperature < 0.0 || self.temperature > 2.0 {
            warnings.push(format!(
                "temperature ({}) is outside the typical range 0.0-2.0",
                self.temperature
            ));
        }
        if self.max_document_chars < 200 {
            warnings.push(format!(
                "max_document_chars ({}) is very small; most documents will be truncated to uselessness",
                self.max_document_chars
            ));
        }
        warnings
    }
}

/// Connection settings for one provider family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional API key literal. Takes precedence over the env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    fn for_env(api_key_env: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: None,
        }
    }

    /// Resolve the API key from the configured literal or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

/// Per-family provider connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub groq: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: ProviderConfig::for_env("GEMINI_API_KEY"),
            openai: ProviderConfig::for_env("OPENAI_API_KEY"),
            anthropic: ProviderConfig::for_env("ANTHROPIC_API_KEY"),
            groq: ProviderConfig::for_env("GROQ_API_KEY"),
        }
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `LEGALMIND_`)
/// 3. Workspace-local config (`.legalmind/config.toml`)
/// 4. User config (`~/.config/legalmind/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&AppConfig>,
) -> Result<AppConfig, AnalysisError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "legalmind", "legalmind") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".legalmind").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (LEGALMIND_ANALYSIS__DEFAULT_MODEL, etc.)
    figment = figment.merge(Env::prefixed("LEGALMIND_").split("__"));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    Ok(figment.extract().map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.request_timeout_secs, 60);
        assert_eq!(config.analysis.comparison_timeout_secs, 120);
        assert_eq!(config.analysis.max_document_chars, 8000);
        assert_eq!(config.analysis.default_model, "gemini-2.0-flash");
        assert_eq!(config.providers.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.providers.groq.api_key_env, "GROQ_API_KEY");
        assert!(config.providers.openai.base_url.is_none());
    }

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(AppConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_timeouts() {
        let mut config = AppConfig::default();
        config.analysis.request_timeout_secs = 0;
        config.analysis.comparison_timeout_secs = 0;
        let warnings = config.validate();
        assert!(!warnings.is_empty());
        assert!(warnings.iter().any(|w| w.contains("request_timeout_secs")));
    }

    #[test]
    fn test_validate_flags_odd_temperature() {
        let mut config = AppConfig::default();
        config.analysis.temperature = 3.5;
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("temperature")));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            deserialized.analysis.default_model,
            config.analysis.default_model
        );
        assert_eq!(
            deserialized.providers.anthropic.api_key_env,
            config.providers.anthropic.api_key_env
        );
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = AppConfig::default();
        overrides.analysis.default_model = "claude-sonnet-4-20250514".to_string();
        overrides.analysis.comparison_timeout_secs = 300;

        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.analysis.default_model, "claude-sonnet-4-20250514");
        assert_eq!(config.analysis.comparison_timeout_secs, 300);
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let legalmind_dir = dir.path().join(".legalmind");
        std::fs::create_dir_all(&legalmind_dir).unwrap();
        std::fs::write(
            legalmind_dir.join("config.toml"),
            r#"
[analysis]
request_timeout_secs = 30
comparison_timeout_secs = 90
temperature = 0.1
max_output_tokens = 2048
max_document_chars = 4000
default_model = "gpt-4o-mini"

[providers.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://my-proxy.example.com/v1"
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.analysis.request_timeout_secs, 30);
        assert_eq!(config.analysis.default_model, "gpt-4o-mini");
        assert_eq!(
            config.providers.openai.base_url.as_deref(),
            Some("https://my-proxy.example.com/v1")
        );
        // Sections absent from the file keep their defaults
        assert_eq!(config.providers.gemini.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_resolve_api_key_prefers_literal() {
        let provider = ProviderConfig {
            api_key_env: "LEGALMIND_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            api_key: Some("literal-key".to_string()),
            base_url: None,
        };
        assert_eq!(provider.resolve_api_key().as_deref(), Some("literal-key"));

        let provider = ProviderConfig::for_env("LEGALMIND_TEST_KEY_THAT_IS_NOT_SET");
        assert_eq!(provider.resolve_api_key(), None);
    }
}

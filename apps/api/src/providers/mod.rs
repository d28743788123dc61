//! Provider registry: the validated, ordered set of AI providers this process can dispatch to.
//!
//! Built once at startup from configuration (loader → validator) and shared read-only
//! as `Arc<ProviderRegistry>`. Changing providers requires a restart.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::providers::loader::LoadedConfig;
use crate::providers::validation::ProviderIssue;

pub mod handlers;
pub mod loader;
pub mod validation;

/// Provider family. Selects the wire format and the default base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderFamily {
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl ProviderFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::DeepSeek => "deepseek",
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::OpenAiCompatible => "openai_compatible",
        }
    }

    /// Parses an explicit `{ID}_PROVIDER` value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "deepseek" => Some(ProviderFamily::DeepSeek),
            "gemini" | "google" => Some(ProviderFamily::Gemini),
            "openai" => Some(ProviderFamily::OpenAi),
            "openai_compatible" | "compatible" => Some(ProviderFamily::OpenAiCompatible),
            _ => None,
        }
    }

    /// Family implied by a provider identifier when no override is given.
    pub fn infer(id: &str) -> Self {
        match id {
            "deepseek" => ProviderFamily::DeepSeek,
            "gemini" | "google" => ProviderFamily::Gemini,
            "openai" => ProviderFamily::OpenAi,
            _ => ProviderFamily::OpenAiCompatible,
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderFamily::DeepSeek => Some("https://api.deepseek.com/v1"),
            ProviderFamily::Gemini => Some("https://generativelanguage.googleapis.com/v1beta"),
            ProviderFamily::OpenAi => Some("https://api.openai.com/v1"),
            ProviderFamily::OpenAiCompatible => None,
        }
    }
}

/// A validated provider. Immutable for the lifetime of the process.
#[derive(Debug)]
pub struct ProviderConfig {
    pub id: String,
    pub family: ProviderFamily,
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub display_name: String,
}

/// One entry of `GET /api/available_models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOption {
    pub value: String,
    pub display_name: String,
    pub model_name: String,
}

/// Body of `GET /api/config_summary`. Never carries API keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub available_models: Vec<String>,
    pub configured_models: Vec<String>,
    pub default_model: Option<String>,
    pub model_count: usize,
    pub models: Vec<ModelOption>,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ProviderRegistry {
    declared: Vec<String>,
    providers: Vec<ProviderConfig>,
    issues: Vec<ProviderIssue>,
    default_model: Option<String>,
}

impl ProviderRegistry {
    /// Loads and validates providers from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(loader::load(lookup))
    }

    /// Validates every declaration. Incomplete providers are logged and excluded;
    /// an empty registry is a warning, never an error.
    pub fn build(loaded: LoadedConfig) -> Self {
        let declared: Vec<String> = loaded.declarations.iter().map(|d| d.id.clone()).collect();
        let mut providers = Vec::new();
        let mut issues = Vec::new();

        for declaration in loaded.declarations {
            match validation::validate(declaration) {
                Ok(provider) => providers.push(provider),
                Err(issue) => {
                    warn!("{issue}");
                    issues.push(issue);
                }
            }
        }

        if providers.is_empty() {
            warn!("No usable AI model configured; /api/available_models will be empty");
        }

        let default_model = resolve_default(loaded.default_model.as_deref(), &providers);

        Self {
            declared,
            providers,
            issues,
            default_model,
        }
    }

    /// Case-insensitive lookup by identifier.
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        let id = id.trim().to_lowercase();
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn is_available(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Usable providers in declaration order.
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn issues(&self) -> &[ProviderIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn default_model(&self) -> Option<&ProviderConfig> {
        self.default_model.as_deref().and_then(|id| self.get(id))
    }

    pub fn list(&self) -> Vec<ModelOption> {
        self.providers
            .iter()
            .map(|p| ModelOption {
                value: p.id.clone(),
                display_name: p.display_name.clone(),
                model_name: p.model.clone(),
            })
            .collect()
    }

    /// Configuration-wide problems, suitable for showing to an operator.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.declared.is_empty() {
            errors.push(format!(
                "No AI models declared ({})",
                loader::AI_MODELS_VAR
            ));
        }
        if self.providers.is_empty() {
            errors.push("No usable AI model configuration".to_string());
        }
        errors.extend(self.issues.iter().map(ToString::to_string));
        errors
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            available_models: self.declared.clone(),
            configured_models: self.providers.iter().map(|p| p.id.clone()).collect(),
            default_model: self.default_model.clone(),
            model_count: self.providers.len(),
            models: self.list(),
            errors: self.validation_errors(),
        }
    }

    /// Logs the outcome of configuration loading once at startup.
    pub fn log_summary(&self) {
        info!(
            "AI models: {} declared, {} usable [{}], default: {}",
            self.declared.len(),
            self.providers.len(),
            self.providers
                .iter()
                .map(|p| format!("{} ({})", p.id, p.model))
                .collect::<Vec<_>>()
                .join(", "),
            self.default_model.as_deref().unwrap_or("none")
        );
    }
}

/// `DEFAULT_AI_MODEL` if usable, else the first usable provider, else none.
fn resolve_default(requested: Option<&str>, providers: &[ProviderConfig]) -> Option<String> {
    if let Some(requested) = requested {
        if providers.iter().any(|p| p.id == requested) {
            return Some(requested.to_string());
        }
        warn!(
            "{} '{requested}' is not a usable AI model; falling back to the first configured one",
            loader::DEFAULT_AI_MODEL_VAR
        );
    }
    providers.first().map(|p| p.id.clone())
}

#[cfg(test)]
impl ProviderRegistry {
    /// Builds a registry from literal `KEY=value` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let vars: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }
}

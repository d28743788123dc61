//! Config Loader: reads provider declarations from a key-value source.
//!
//! Production passes the process environment; tests pass a map. The loader never
//! validates: every declared identifier yields a `ProviderDeclaration`, complete or not.

use secrecy::SecretString;
use tracing::warn;

/// Identifiers enabled when `AI_MODELS` is not set at all.
pub const DEFAULT_AI_MODELS: &str = "deepseek,gemini";

pub const AI_MODELS_VAR: &str = "AI_MODELS";
pub const DEFAULT_AI_MODEL_VAR: &str = "DEFAULT_AI_MODEL";

/// Raw per-provider values as found in configuration. Blank values are `None`.
#[derive(Debug)]
pub struct ProviderDeclaration {
    pub id: String,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub display_name: Option<String>,
    /// Explicit provider family override (`{ID}_PROVIDER`).
    pub provider: Option<String>,
}

/// Everything the loader read, in declaration order.
#[derive(Debug)]
pub struct LoadedConfig {
    pub declarations: Vec<ProviderDeclaration>,
    pub default_model: Option<String>,
}

/// Reads `AI_MODELS`, `DEFAULT_AI_MODEL` and the `{ID}_*` variables of every declared provider.
pub fn load<F>(lookup: F) -> LoadedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let raw_models = lookup(AI_MODELS_VAR).unwrap_or_else(|| DEFAULT_AI_MODELS.to_string());

    let declarations = parse_model_list(&raw_models)
        .into_iter()
        .map(|id| {
            let prefix = env_prefix(&id);
            let read = |field: &str| non_blank(lookup(&format!("{prefix}_{field}")));
            ProviderDeclaration {
                api_key: read("API_KEY").map(SecretString::from),
                base_url: read("BASE_URL"),
                model: read("MODEL"),
                display_name: read("DISPLAY_NAME"),
                provider: read("PROVIDER"),
                id,
            }
        })
        .collect();

    LoadedConfig {
        declarations,
        default_model: non_blank(lookup(DEFAULT_AI_MODEL_VAR)).map(|m| m.to_lowercase()),
    }
}

/// Splits a comma-separated identifier list. Identifiers are trimmed and lowercased;
/// empty entries are dropped and only the first occurrence of a duplicate is kept.
/// Identifiers that read the same `{PREFIX}_*` variables (`my-llm`, `my_llm`) count as duplicates.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(|s| s.trim().to_lowercase()) {
        if id.is_empty() {
            continue;
        }
        if ids.contains(&id) {
            warn!("{AI_MODELS_VAR} lists '{id}' more than once; ignoring the duplicate");
            continue;
        }
        let prefix = env_prefix(&id);
        if let Some(existing) = ids.iter().find(|other| env_prefix(other) == prefix) {
            warn!(
                "{AI_MODELS_VAR} entries '{existing}' and '{id}' both read {prefix}_* variables; ignoring '{id}'"
            );
            continue;
        }
        ids.push(id);
    }
    ids
}

/// Environment variable prefix for an identifier: uppercased, non-alphanumerics as `_`.
/// `azure-gpt4` reads `AZURE_GPT4_API_KEY`.
pub fn env_prefix(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

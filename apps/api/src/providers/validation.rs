//! Config Validator: turns a `ProviderDeclaration` into a usable `ProviderConfig`
//! or a `ProviderIssue` naming every missing or invalid field.

use serde::Serialize;
use thiserror::Error;

use crate::providers::loader::{env_prefix, ProviderDeclaration};
use crate::providers::{ProviderConfig, ProviderFamily};

/// A single reason a declared provider cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    #[error("API_KEY")]
    MissingApiKey,

    #[error("MODEL")]
    MissingModel,

    /// Only `openai_compatible` providers have no default base URL.
    #[error("BASE_URL")]
    MissingBaseUrl,

    #[error("PROVIDER (unrecognised value '{0}')")]
    UnknownProvider(String),
}

/// A declared provider excluded from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderIssue {
    pub id: String,
    pub problems: Vec<FieldProblem>,
}

impl std::fmt::Display for ProviderIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .problems
            .iter()
            .map(|p| format!("{}_{p}", env_prefix(&self.id)))
            .collect();
        write!(
            f,
            "AI model '{}' is incomplete, missing or invalid: {}",
            self.id,
            fields.join(", ")
        )
    }
}

/// Validates one declaration. Every problem is collected, not just the first.
pub fn validate(declaration: ProviderDeclaration) -> Result<ProviderConfig, ProviderIssue> {
    let mut problems = Vec::new();

    let family = match declaration.provider.as_deref() {
        Some(raw) => match ProviderFamily::parse(raw) {
            Some(family) => Some(family),
            None => {
                problems.push(FieldProblem::UnknownProvider(raw.to_string()));
                None
            }
        },
        None => Some(ProviderFamily::infer(&declaration.id)),
    };

    if declaration.api_key.is_none() {
        problems.push(FieldProblem::MissingApiKey);
    }
    if declaration.model.is_none() {
        problems.push(FieldProblem::MissingModel);
    }

    let base_url = declaration.base_url.or_else(|| {
        family
            .and_then(|f| f.default_base_url())
            .map(str::to_string)
    });
    if base_url.is_none() && family.is_some() {
        problems.push(FieldProblem::MissingBaseUrl);
    }

    match (family, declaration.api_key, declaration.model, base_url) {
        (Some(family), Some(api_key), Some(model), Some(base_url)) if problems.is_empty() => {
            Ok(ProviderConfig {
                display_name: declaration
                    .display_name
                    .unwrap_or_else(|| declaration.id.clone()),
                id: declaration.id,
                family,
                api_key,
                base_url: base_url.trim_end_matches('/').to_string(),
                model,
            })
        }
        _ => Err(ProviderIssue {
            id: declaration.id,
            problems,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::{ExposeSecret, SecretString};

    fn declaration(id: &str) -> ProviderDeclaration {
        ProviderDeclaration {
            id: id.to_string(),
            api_key: Some(SecretString::from("key")),
            base_url: None,
            model: Some("some-model".to_string()),
            display_name: None,
            provider: None,
        }
    }

    #[test]
    fn test_complete_declaration_uses_family_default_base_url() {
        let config = validate(declaration("deepseek")).unwrap();
        assert_eq!(config.family, ProviderFamily::DeepSeek);
        assert_eq!(config.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.api_key.expose_secret(), "key");
    }

    #[test]
    fn test_display_name_defaults_to_identifier() {
        let config = validate(declaration("gemini")).unwrap();
        assert_eq!(config.display_name, "gemini");
    }

    #[test]
    fn test_explicit_base_url_wins_and_loses_trailing_slash() {
        let mut decl = declaration("deepseek");
        decl.base_url = Some("https://api.siliconflow.cn/v1/".to_string());
        let config = validate(decl).unwrap();
        assert_eq!(config.base_url, "https://api.siliconflow.cn/v1");
    }

    #[test]
    fn test_missing_key_and_model_are_both_reported() {
        let mut decl = declaration("gemini");
        decl.api_key = None;
        decl.model = None;
        let issue = validate(decl).unwrap_err();
        assert_eq!(issue.id, "gemini");
        assert_eq!(
            issue.problems,
            vec![FieldProblem::MissingApiKey, FieldProblem::MissingModel]
        );
        assert_eq!(
            issue.to_string(),
            "AI model 'gemini' is incomplete, missing or invalid: GEMINI_API_KEY, GEMINI_MODEL"
        );
    }

    #[test]
    fn test_openai_compatible_requires_base_url() {
        let issue = validate(declaration("siliconflow")).unwrap_err();
        assert_eq!(issue.problems, vec![FieldProblem::MissingBaseUrl]);

        let mut decl = declaration("siliconflow");
        decl.base_url = Some("https://api.siliconflow.cn/v1".to_string());
        let config = validate(decl).unwrap();
        assert_eq!(config.family, ProviderFamily::OpenAiCompatible);
    }

    #[test]
    fn test_provider_override_selects_family() {
        let mut decl = declaration("flash");
        decl.provider = Some("Gemini".to_string());
        let config = validate(decl).unwrap();
        assert_eq!(config.family, ProviderFamily::Gemini);
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_unknown_provider_override_is_an_issue() {
        let mut decl = declaration("deepseek");
        decl.provider = Some("anthropic".to_string());
        let issue = validate(decl).unwrap_err();
        assert_eq!(
            issue.problems,
            vec![FieldProblem::UnknownProvider("anthropic".to_string())]
        );
    }
}

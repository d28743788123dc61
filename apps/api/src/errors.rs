use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller selected a provider that is not in the registry. Never falls back.
    #[error("Invalid AI model selection '{requested}'")]
    InvalidModel {
        requested: String,
        available: Vec<String>,
    },

    #[error("No AI model is configured")]
    NoModelConfigured,

    /// The provider answered with a non-2xx status. Its message is passed through unmodified.
    #[error("Provider '{provider}' returned status {status}: {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a client-level failure of `provider`.
    pub fn from_llm(provider: &str, error: LlmError) -> Self {
        match error {
            LlmError::Api { status, message } => AppError::Provider {
                provider: provider.to_string(),
                status,
                message,
            },
            other => AppError::Llm(format!("{provider}: {other}")),
        }
    }
}

/// Malformed or mistyped request bodies become `VALIDATION_ERROR` instead of axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejection is an `AppError`, so every error body has the same shape.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidModel {
                requested,
                available,
            } => (
                StatusCode::BAD_REQUEST,
                "INVALID_MODEL",
                format!(
                    "AI model '{requested}' is not available. Available models: [{}]",
                    available.join(", ")
                ),
            ),
            AppError::NoModelConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NO_MODEL_CONFIGURED",
                "No AI model is configured. Set AI_MODELS and the matching credentials".to_string(),
            ),
            AppError::Provider {
                provider,
                status,
                message,
            } => {
                tracing::warn!("Provider {provider} returned {status}: {message}");
                if *status == 429 {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        "PROVIDER_RATE_LIMITED",
                        format!("{provider}: {message}"),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_ERROR",
                        format!("{provider} (status {status}): {message}"),
                    )
                }
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

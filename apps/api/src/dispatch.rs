//! Request Dispatcher: resolves a caller's `model_type` to a registered provider
//! and forwards the chat request to it.
//!
//! An unknown selection is an error, never a silent substitution. Only an omitted
//! selection falls back to the registry's default model.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{ChatBackend, ChatRequest, Completion};
use crate::providers::{ProviderConfig, ProviderRegistry};

/// A typed answer plus the provider and model that produced it.
#[derive(Debug, Clone)]
pub struct Answer<T> {
    pub value: T,
    pub provider: String,
    pub model: String,
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    backend: Arc<dyn ChatBackend>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ProviderRegistry>, backend: Arc<dyn ChatBackend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// `Some(id)` must name a registered provider; `None` or a blank value selects the default.
    pub fn resolve(&self, model_type: Option<&str>) -> Result<&ProviderConfig, AppError> {
        match model_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(requested) => self.registry.get(requested).ok_or_else(|| {
                warn!("Rejected request for unknown AI model '{requested}'");
                AppError::InvalidModel {
                    requested: requested.to_string(),
                    available: self
                        .registry
                        .providers()
                        .iter()
                        .map(|p| p.id.clone())
                        .collect(),
                }
            }),
            None => self
                .registry
                .default_model()
                .ok_or(AppError::NoModelConfigured),
        }
    }

    /// Sends `request` to the selected provider and returns its answer unmodified.
    pub async fn complete(
        &self,
        model_type: Option<&str>,
        request: &ChatRequest,
    ) -> Result<Completion, AppError> {
        let provider = self.resolve(model_type)?;
        info!("Dispatching to {} ({})", provider.id, provider.model);

        self.backend
            .complete(provider, request)
            .await
            .map_err(|e| AppError::from_llm(&provider.id, e))
    }

    /// Like `complete`, then deserializes the answer as JSON.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        model_type: Option<&str>,
        request: &ChatRequest,
    ) -> Result<Answer<T>, AppError> {
        let completion = self.complete(model_type, request).await?;
        let value = completion.parse_json::<T>().map_err(|e| {
            AppError::Llm(format!(
                "{} returned an answer that is not the expected JSON: {e}",
                completion.provider
            ))
        })?;

        Ok(Answer {
            value,
            provider: completion.provider,
            model: completion.model,
        })
    }
}

//! LLM Client: the single point of entry for all provider chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Task services build a `ChatRequest` and hand it to the `Dispatcher`, which picks
//! the provider; this module only knows how to speak each provider family's wire format.
//!
//! No retries: a provider failure is returned to the caller as-is.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::providers::{ProviderConfig, ProviderFamily};

pub mod gemini;
pub mod lenient;
pub mod openai;
pub mod prompts;

#[cfg(test)]
pub mod fake;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Role name in the OpenAI chat-completions format.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One earlier message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat request: system prompt, optional earlier turns, then the new user prompt.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub history: Vec<ChatTurn>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            history: Vec::new(),
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Turns sent before `prompt`, oldest first.
    pub fn history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The provider's answer, tagged with who produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub provider: String,
    pub model: String,
    pub text: String,
    pub usage: Option<Usage>,
}

impl Completion {
    /// Deserializes the text as JSON. The prompt must instruct the model to return JSON.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T, LlmError> {
        serde_json::from_str(strip_json_fences(&self.text)).map_err(LlmError::Parse)
    }
}

/// Sends one chat request to one provider. The `Dispatcher` holds an `Arc<dyn ChatBackend>`;
/// tests swap in a recording fake.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<Completion, LlmError>;
}

/// HTTP backend over `reqwest`, shared by every provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new(timeout: std::time::Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<Completion, LlmError> {
        let completion = match provider.family {
            ProviderFamily::Gemini => gemini::complete(&self.client, provider, request).await?,
            ProviderFamily::DeepSeek | ProviderFamily::OpenAi | ProviderFamily::OpenAiCompatible => {
                openai::complete(&self.client, provider, request).await?
            }
        };

        if let Some(usage) = completion.usage {
            debug!(
                "LLM call to {} succeeded: input_tokens={}, output_tokens={}",
                provider.id, usage.input_tokens, usage.output_tokens
            );
        }

        Ok(completion)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Builds `LlmError::Api` from a non-2xx response body. OpenAI-style and Gemini
/// errors share the `{"error": {"message": ...}}` shape; anything else is kept verbatim.
pub(crate) fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ProviderErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

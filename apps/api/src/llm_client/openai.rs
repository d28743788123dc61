//! OpenAI chat-completions wire format. Used by DeepSeek, OpenAI and every
//! OpenAI-compatible endpoint.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::llm_client::{api_error, ChatRequest, Completion, LlmError, Usage};
use crate::providers::ProviderConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

pub fn endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// System message, earlier turns in order, then the new user message.
fn build_request<'a>(model: &'a str, request: &'a ChatRequest) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage {
        role: "system",
        content: &request.system,
    });
    messages.extend(request.history.iter().map(|turn| ChatMessage {
        role: turn.role.as_str(),
        content: &turn.content,
    }));
    messages.push(ChatMessage {
        role: "user",
        content: &request.prompt,
    });

    ChatCompletionRequest {
        model,
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

pub(super) async fn complete(
    client: &Client,
    provider: &ProviderConfig,
    request: &ChatRequest,
) -> Result<Completion, LlmError> {
    let response = client
        .post(endpoint(&provider.base_url))
        .bearer_auth(provider.api_key.expose_secret())
        .json(&build_request(&provider.model, request))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(api_error(status.as_u16(), body));
    }

    let parsed: ChatCompletionResponse = response.json().await?;
    into_completion(provider, parsed)
}

fn into_completion(
    provider: &ProviderConfig,
    response: ChatCompletionResponse,
) -> Result<Completion, LlmError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyContent)?;

    Ok(Completion {
        provider: provider.id.clone(),
        model: provider.model.clone(),
        text,
        usage: response.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

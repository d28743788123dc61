//! Recording `ChatBackend` for tests. Never touches the network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatBackend, ChatRequest, Completion, LlmError};
use crate::providers::ProviderConfig;

/// A call the fake received: provider identifier plus the request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub provider: String,
    pub request: ChatRequest,
}

enum Reply {
    Text(String),
    ApiError { status: u16, message: String },
}

/// Answers with queued replies, repeating the last one once the queue is drained.
pub struct FakeBackend {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_replies(vec![Reply::Text(text.into())])
    }

    pub fn replying_all(texts: &[&str]) -> Self {
        Self::with_replies(texts.iter().map(|t| Reply::Text(t.to_string())).collect())
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_replies(vec![Reply::ApiError {
            status,
            message: message.into(),
        }])
    }

    fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<Completion, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            provider: provider.id.clone(),
            request: request.clone(),
        });

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            None
        };
        let reply = reply.as_ref().or(replies.front());

        match reply {
            Some(Reply::Text(text)) => Ok(Completion {
                provider: provider.id.clone(),
                model: provider.model.clone(),
                text: text.clone(),
                usage: None,
            }),
            Some(Reply::ApiError { status, message }) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}

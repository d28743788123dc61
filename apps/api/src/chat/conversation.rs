//! Per-document conversations.
//!
//! Opening a conversation sends the document with an analysis request; every later
//! message is sent with the full earlier history. A conversation remembers the provider
//! that opened it and keeps using it unless a message selects another one.
//!
//! The store lock is never held across a provider call: history is cloned, the call
//! is made, then the new user and assistant turns are appended together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::chat::prompts::{DOCUMENT_ANALYSIS_PROMPT_TEMPLATE, DOCUMENT_CHAT_SYSTEM};
use crate::dispatch::Dispatcher;
use crate::errors::AppError;
use crate::llm_client::prompts::render;
use crate::llm_client::{ChatRequest, ChatTurn};
use crate::pool::parse_doc_id;

const TEMPERATURE: f32 = 0.7;
const OPENING_MAX_TOKENS: u32 = 2000;
const REPLY_MAX_TOKENS: u32 = 1500;

#[derive(Debug, Clone)]
pub struct Conversation {
    pub doc_id: Uuid,
    pub filename: String,
    pub provider: String,
    /// Oldest first. Starts with the document turn and the provider's analysis.
    pub turns: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenedConversation {
    pub success: bool,
    pub doc_id: Uuid,
    pub filename: String,
    pub analysis: String,
    pub text_length: usize,
    pub message: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub doc_id: Uuid,
    pub user_message: String,
    pub ai_response: String,
    /// Turns stored after this exchange, including the opening pair.
    pub conversation_length: usize,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub doc_id: Uuid,
    pub filename: String,
    pub history: Vec<ChatTurn>,
    pub count: usize,
    pub created_at: DateTime<Utc>,
}

pub struct ConversationStore {
    conversations: RwLock<HashMap<Uuid, Conversation>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, doc_id: Uuid) -> Option<Conversation> {
        self.conversations.read().await.get(&doc_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    async fn insert(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.doc_id, conversation);
    }

    /// Appends one exchange. Returns the new turn count, or `None` if the
    /// conversation was cleared while the provider was answering.
    async fn append(&self, doc_id: Uuid, user: ChatTurn, assistant: ChatTurn) -> Option<usize> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(&doc_id)?;
        conversation.turns.push(user);
        conversation.turns.push(assistant);
        Some(conversation.turns.len())
    }

    pub async fn remove(&self, doc_id: Uuid) -> Option<Conversation> {
        self.conversations.write().await.remove(&doc_id)
    }
}

fn not_found(doc_id: Uuid) -> AppError {
    AppError::NotFound(format!(
        "Conversation for document {doc_id} not found. Upload the document first"
    ))
}

pub fn build_opening_request(document_text: &str) -> ChatRequest {
    let prompt = render(
        DOCUMENT_ANALYSIS_PROMPT_TEMPLATE,
        &[("document_text", document_text)],
    );
    ChatRequest::new(DOCUMENT_CHAT_SYSTEM, prompt)
        .temperature(TEMPERATURE)
        .max_tokens(OPENING_MAX_TOKENS)
}

/// Analyses a new document and starts its conversation.
pub async fn open_conversation(
    store: &ConversationStore,
    filename: &str,
    document_text: &str,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<OpenedConversation, AppError> {
    let request = build_opening_request(document_text);
    let completion = dispatcher.complete(model_type, &request).await?;

    let doc_id = Uuid::new_v4();
    store
        .insert(Conversation {
            doc_id,
            filename: filename.to_string(),
            provider: completion.provider.clone(),
            turns: vec![
                ChatTurn::user(request.prompt),
                ChatTurn::assistant(completion.text.clone()),
            ],
            created_at: Utc::now(),
        })
        .await;
    info!(
        "Opened conversation {doc_id} for {filename} with {}",
        completion.provider
    );

    Ok(OpenedConversation {
        success: true,
        doc_id,
        filename: filename.to_string(),
        analysis: completion.text,
        text_length: document_text.chars().count(),
        message: "Document analysed".to_string(),
        provider: completion.provider,
        model: completion.model,
    })
}

/// Sends `message` with the conversation so far and records the exchange.
pub async fn continue_conversation(
    store: &ConversationStore,
    doc_id: &str,
    message: &str,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<ChatReply, AppError> {
    let doc_id = parse_doc_id(doc_id)?;
    let conversation = store.get(doc_id).await.ok_or_else(|| not_found(doc_id))?;

    let selected = model_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(conversation.provider.as_str());
    let request = ChatRequest::new(DOCUMENT_CHAT_SYSTEM, message)
        .history(conversation.turns)
        .temperature(TEMPERATURE)
        .max_tokens(REPLY_MAX_TOKENS);
    let completion = dispatcher.complete(Some(selected), &request).await?;

    let conversation_length = store
        .append(
            doc_id,
            ChatTurn::user(message),
            ChatTurn::assistant(completion.text.clone()),
        )
        .await
        .ok_or_else(|| not_found(doc_id))?;
    info!(
        "Conversation {doc_id}: {conversation_length} turns, answered by {}",
        completion.provider
    );

    Ok(ChatReply {
        success: true,
        doc_id,
        user_message: message.to_string(),
        ai_response: completion.text,
        conversation_length,
        provider: completion.provider,
        model: completion.model,
    })
}

pub async fn history(
    store: &ConversationStore,
    doc_id: &str,
) -> Result<ConversationHistory, AppError> {
    let doc_id = parse_doc_id(doc_id)?;
    let conversation = store.get(doc_id).await.ok_or_else(|| not_found(doc_id))?;
    Ok(ConversationHistory {
        doc_id,
        filename: conversation.filename,
        count: conversation.turns.len(),
        history: conversation.turns,
        created_at: conversation.created_at,
    })
}

pub async fn clear(store: &ConversationStore, doc_id: &str) -> Result<(), AppError> {
    let doc_id = parse_doc_id(doc_id)?;
    store.remove(doc_id).await.ok_or_else(|| not_found(doc_id))?;
    info!("Cleared conversation {doc_id}");
    Ok(())
}

//! Axum route handlers for the Document chat API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::chat::conversation::{
    clear, continue_conversation, history, open_conversation, ChatReply, ConversationHistory,
    OpenedConversation,
};
use crate::errors::{AppError, AppJson};
use crate::pool::PoolMessageResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadDocumentRequest {
    pub filename: String,
    #[serde(default)]
    pub text: String,
    pub model_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatWithDocumentRequest {
    pub doc_id: String,
    pub message: String,
    pub model_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearConversationRequest {
    pub doc_id: String,
}

/// POST /api/upload_document
pub async fn handle_upload_document(
    State(state): State<AppState>,
    AppJson(request): AppJson<UploadDocumentRequest>,
) -> Result<Json<OpenedConversation>, AppError> {
    let filename = request.filename.trim();
    if filename.is_empty() {
        return Err(AppError::Validation("filename cannot be empty".to_string()));
    }
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Document contains no text to analyse".to_string(),
        ));
    }

    let opened = open_conversation(
        &state.conversations,
        filename,
        text,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;
    Ok(Json(opened))
}

/// POST /api/chat_with_document
pub async fn handle_chat_with_document(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatWithDocumentRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = continue_conversation(
        &state.conversations,
        &request.doc_id,
        message,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;
    Ok(Json(reply))
}

/// POST /api/clear_conversation
pub async fn handle_clear_conversation(
    State(state): State<AppState>,
    AppJson(request): AppJson<ClearConversationRequest>,
) -> Result<Json<PoolMessageResponse>, AppError> {
    clear(&state.conversations, &request.doc_id).await?;
    Ok(Json(PoolMessageResponse {
        success: true,
        message: "Conversation cleared".to_string(),
    }))
}

/// GET /api/conversation_history/:doc_id
pub async fn handle_conversation_history(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<ConversationHistory>, AppError> {
    Ok(Json(history(&state.conversations, &doc_id).await?))
}

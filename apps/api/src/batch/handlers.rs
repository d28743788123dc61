//! Axum route handlers for the Batch screening API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::batch::query::{query_resumes, BatchQueryResponse};
use crate::errors::{AppError, AppJson};
use crate::pool::{
    AddDocumentRequest, AddDocumentResponse, PoolMessageResponse, PoolStatus,
    RemoveDocumentRequest,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchQueryRequest {
    pub query: String,
    pub model_type: Option<String>,
}

/// POST /api/batch_add_resume
pub async fn handle_add_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddDocumentRequest>,
) -> Result<Json<AddDocumentResponse>, AppError> {
    let response = state
        .resume_pool
        .handle_add(request, "Resume added to the screening pool")
        .await?;
    Ok(Json(response))
}

/// POST /api/batch_query
pub async fn handle_batch_query(
    State(state): State<AppState>,
    AppJson(request): AppJson<BatchQueryRequest>,
) -> Result<Json<BatchQueryResponse>, AppError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let pool = state.resume_pool.snapshot().await;
    let response = query_resumes(
        query,
        pool,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/batch_pool_status
pub async fn handle_pool_status(State(state): State<AppState>) -> Json<PoolStatus> {
    Json(state.resume_pool.status().await)
}

/// POST /api/batch_clear_pool
pub async fn handle_clear_pool(State(state): State<AppState>) -> Json<PoolMessageResponse> {
    Json(state.resume_pool.handle_clear().await)
}

/// POST /api/batch_remove_resume
pub async fn handle_remove_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<RemoveDocumentRequest>,
) -> Result<Json<PoolMessageResponse>, AppError> {
    let response = state.resume_pool.handle_remove(&request.doc_id).await?;
    Ok(Json(response))
}

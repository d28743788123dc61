//! Axum route handlers for the Benefits policy API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::benefits::query::{query_benefits, BenefitQueryResponse};
use crate::errors::{AppError, AppJson};
use crate::pool::{
    AddDocumentRequest, AddDocumentResponse, PoolMessageResponse, PoolStatus,
    RemoveDocumentRequest,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BenefitQueryRequest {
    pub query: String,
    pub model_type: Option<String>,
}

/// POST /api/benefit_add_document
pub async fn handle_add_document(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddDocumentRequest>,
) -> Result<Json<AddDocumentResponse>, AppError> {
    let response = state
        .benefit_pool
        .handle_add(request, "Document added to the benefits policy library")
        .await?;
    Ok(Json(response))
}

/// POST /api/benefit_query
pub async fn handle_benefit_query(
    State(state): State<AppState>,
    AppJson(request): AppJson<BenefitQueryRequest>,
) -> Result<Json<BenefitQueryResponse>, AppError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let pool = state.benefit_pool.snapshot().await;
    let response = query_benefits(
        query,
        pool,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/benefit_pool_status
pub async fn handle_pool_status(State(state): State<AppState>) -> Json<PoolStatus> {
    Json(state.benefit_pool.status().await)
}

/// POST /api/benefit_clear_pool
pub async fn handle_clear_pool(State(state): State<AppState>) -> Json<PoolMessageResponse> {
    Json(state.benefit_pool.handle_clear().await)
}

/// POST /api/benefit_remove_document
pub async fn handle_remove_document(
    State(state): State<AppState>,
    AppJson(request): AppJson<RemoveDocumentRequest>,
) -> Result<Json<PoolMessageResponse>, AppError> {
    let response = state.benefit_pool.handle_remove(&request.doc_id).await?;
    Ok(Json(response))
}

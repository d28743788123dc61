//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{analyze_resume, ResumeAnalysis};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub resume_text: String,
    pub filename: Option<String>,
    pub model_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResumeResponse {
    pub filename: Option<String>,
    pub analysis: ResumeAnalysis,
    pub provider: String,
    pub model: String,
}

/// POST /upload
///
/// Analyses one resume's extracted text with the selected provider.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let answer = analyze_resume(
        &request.resume_text,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;

    Ok(Json(AnalyzeResumeResponse {
        filename: request.filename,
        analysis: answer.value,
        provider: answer.provider,
        model: answer.model,
    }))
}

//! Axum route handlers for the Screening API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::screening::screener::{screen_resumes, ScreenCandidate, ScreeningResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    pub requirements: String,
    /// Resumes to screen. When omitted, every resume in the batch pool with text is screened.
    pub resumes: Option<Vec<ScreenCandidate>>,
    pub model_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub requirements: String,
    pub results: Vec<ScreeningResult>,
    pub total_count: usize,
    pub provider: String,
    pub model: String,
}

/// POST /screen
pub async fn handle_screen(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScreenRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    let requirements = request.requirements.trim();
    if requirements.is_empty() {
        return Err(AppError::Validation(
            "requirements cannot be empty".to_string(),
        ));
    }

    let candidates: Vec<ScreenCandidate> = match request.resumes {
        Some(resumes) => resumes
            .into_iter()
            .filter(|r| !r.text.trim().is_empty())
            .collect(),
        None => state
            .resume_pool
            .snapshot()
            .await
            .iter()
            .filter(|d| !d.parse_error)
            .map(ScreenCandidate::from)
            .collect(),
    };

    if candidates.is_empty() {
        return Err(AppError::Validation(
            "No resumes to screen. Add resumes first".to_string(),
        ));
    }

    let outcome = screen_resumes(
        requirements,
        candidates,
        &state.dispatcher,
        request.model_type.as_deref(),
    )
    .await?;

    Ok(Json(ScreenResponse {
        requirements: requirements.to_string(),
        total_count: outcome.results.len(),
        results: outcome.results,
        provider: outcome.provider,
        model: outcome.model,
    }))
}

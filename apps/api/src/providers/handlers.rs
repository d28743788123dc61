use axum::{extract::State, Json};

use crate::providers::{ConfigSummary, ModelOption};
use crate::state::AppState;

/// GET /api/available_models
pub async fn handle_available_models(State(state): State<AppState>) -> Json<Vec<ModelOption>> {
    Json(state.dispatcher.registry().list())
}

/// GET /api/config_summary
pub async fn handle_config_summary(State(state): State<AppState>) -> Json<ConfigSummary> {
    Json(state.dispatcher.registry().summary())
}

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and how many AI models are ready to serve.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener",
        "model_count": registry.providers().len(),
        "default_model": registry.default_model().map(|p| p.id.as_str()),
    }))
}

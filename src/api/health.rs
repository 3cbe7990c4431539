use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::error::AppError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready only once the static data export answers queries.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state
        .catalog
        .ping()
        .await
        .map_err(|e| AppError::Internal(format!("Static data export unavailable: {}", e)))?;
    Ok(Json(serde_json::json!({"status": "ready"})))
}

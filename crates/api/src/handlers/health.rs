//! Liveness endpoint.

use axum::extract::State;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    crm_db::health_check(&state.pool)
        .await
        .map_err(|e| AppError::InternalError(format!("Database unreachable: {e}")))?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

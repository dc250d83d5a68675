//! Publish history endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use super::ApiResult;
use crate::models::{LedgerStats, PublishRecord};
use crate::AppState;

/// GET /api/publish-history - Retained attempts, newest first.
pub async fn list_history(State(state): State<AppState>) -> ApiResult<Json<Vec<PublishRecord>>> {
    Ok(Json(state.ledger.list().await?))
}

/// GET /api/publish-history/stats - Success rate and counts.
pub async fn history_stats(State(state): State<AppState>) -> ApiResult<Json<LedgerStats>> {
    Ok(Json(state.ledger.stats().await?))
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub removed: u64,
}

/// DELETE /api/publish-history - Clear the history.
pub async fn clear_history(
    State(state): State<AppState>,
) -> ApiResult<Json<ClearHistoryResponse>> {
    let removed = state.ledger.clear().await?;
    Ok(Json(ClearHistoryResponse {
        success: true,
        removed,
    }))
}

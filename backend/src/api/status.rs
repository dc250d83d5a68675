//! Publisher status endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub storage: &'static str,
    pub object_key: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    pub history_retention: usize,
}

/// GET /api/status - Storage binding and current published object.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let key = state.config.object_key.clone();

    let current = match &state.store {
        Some(store) => store
            .list(&key)
            .await?
            .into_iter()
            .find(|summary| summary.key == key),
        None => None,
    };

    Ok(Json(StatusResponse {
        storage: state.config.storage_backend.as_str(),
        object_key: key,
        published: current.is_some(),
        size: current.as_ref().map(|summary| summary.size),
        uploaded_at: current.map(|summary| summary.uploaded_at),
        history_retention: state.ledger.retention(),
    }))
}

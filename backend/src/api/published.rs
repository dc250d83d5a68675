//! Storefront read endpoints.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::ApiResult;
use crate::errors::AppError;
use crate::reader::{FetchOutcome, SnapshotSource};
use crate::AppState;

/// Header naming where the catalog came from: `published` or `sample`.
pub const DATA_SOURCE_HEADER: &str = "x-data-source";
/// Header naming why sample data was served.
pub const FALLBACK_REASON_HEADER: &str = "x-fallback-reason";
/// Header carrying the time the published object was written.
pub const UPLOADED_AT_HEADER: &str = "x-uploaded-at";

/// GET /api/published-data - Raw published snapshot.
pub async fn get_published_data(State(state): State<AppState>) -> ApiResult<Response> {
    match state.reader.fetch().await {
        FetchOutcome::Found(object) => Ok((
            [
                (header::CONTENT_TYPE, object.metadata.content_type),
                (header::CACHE_CONTROL, object.metadata.cache_control),
                (HeaderName::from_static(UPLOADED_AT_HEADER), object.uploaded_at),
            ],
            object.body,
        )
            .into_response()),
        FetchOutcome::NotFound => Err(AppError::NotFound("No published data found".to_string())),
        FetchOutcome::Corrupted(msg) => Err(AppError::Corrupted(format!(
            "Published data is corrupted: {}",
            msg
        ))),
        FetchOutcome::Unavailable(e) => Err(e.into()),
        FetchOutcome::NotConfigured => Err(AppError::Configuration(
            "Object storage is not configured".to_string(),
        )),
    }
}

/// GET /api/catalog - Snapshot to render, falling back to sample data.
pub async fn get_catalog(State(state): State<AppState>) -> Response {
    let resolved = state.reader.resolve().await;

    let cache_control = if resolved.is_sample() {
        "no-cache".to_string()
    } else {
        format!("public, max-age={}", state.config.cache_seconds)
    };

    let mut response = (
        StatusCode::OK,
        [(header::CACHE_CONTROL, cache_control)],
        Json(resolved.snapshot),
    )
        .into_response();

    let headers = response.headers_mut();
    match resolved.source {
        SnapshotSource::Published => {
            headers.insert(
                HeaderName::from_static(DATA_SOURCE_HEADER),
                HeaderValue::from_static("published"),
            );
        }
        SnapshotSource::Sample(reason) => {
            headers.insert(
                HeaderName::from_static(DATA_SOURCE_HEADER),
                HeaderValue::from_static("sample"),
            );
            headers.insert(
                HeaderName::from_static(FALLBACK_REASON_HEADER),
                HeaderValue::from_static(reason.as_str()),
            );
        }
    }

    response
}

#[derive(Debug, Serialize)]
pub struct UnpublishResponse {
    pub success: bool,
    pub removed: bool,
}

/// DELETE /api/published-data - Remove the published snapshot.
pub async fn unpublish(State(state): State<AppState>) -> ApiResult<Json<UnpublishResponse>> {
    let removed = state.publisher.unpublish().await?;
    Ok(Json(UnpublishResponse {
        success: true,
        removed,
    }))
}

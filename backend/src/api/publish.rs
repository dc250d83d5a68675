//! Publish and dry-run validation endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{DataStats, NewPublishRecord, Snapshot};
use crate::snapshot;
use crate::validation::{validate, ValidationReport};
use crate::AppState;

/// Request body shared by publish and validate.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

/// Successful publish response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "published_at")]
    pub published_at: String,
    pub file_name: String,
    pub size: usize,
    pub upload_time: u64,
    pub verify_time: u64,
    pub data_keys: Vec<String>,
    pub product_count: usize,
    pub category_count: usize,
    pub warnings: Vec<String>,
    /// Sections the builder synthesized because the draft lacked them.
    pub defaults_applied: Vec<String>,
}

/// POST /api/validate - Validate a draft without publishing it.
pub async fn validate_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> ApiResult<Json<ValidationReport>> {
    let draft = parse_draft(request)?;
    Ok(Json(validate(&draft, &state.config.validation_policy())))
}

/// POST /api/publish - Validate, build, write and verify the snapshot.
pub async fn publish(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> ApiResult<Json<PublishResponse>> {
    let draft = parse_draft(request)?;

    let report = validate(&draft, &state.config.validation_policy());
    for warning in &report.warnings {
        tracing::warn!("Validation warning: {}", warning);
    }

    let mut warnings = report.warnings;
    if !report.valid {
        if state.config.block_on_errors {
            tracing::warn!("Publish blocked by {} validation errors", report.errors.len());
            let entry = NewPublishRecord::failed(
                "Publish blocked by validation errors",
                report.errors.join("; "),
            )
            .with_stats(DataStats {
                products: report.stats.product_count as i64,
                categories: report.stats.category_count as i64,
                total_size: 0,
            });
            record_attempt(&state, entry).await;

            return Err(AppError::Validation {
                errors: report.errors,
                warnings,
            });
        }

        tracing::warn!(
            "Publishing despite {} validation errors (blocking disabled)",
            report.errors.len()
        );
        warnings.extend(report.errors);
    }

    let built = snapshot::build(draft);
    let defaults_applied = built
        .defaults_applied
        .iter()
        .map(|section| section.to_string())
        .collect();
    let snapshot = built.snapshot;
    let outcome = state.publisher.publish(&snapshot).await;

    let product_count = snapshot.products.len();
    let category_count = snapshot.categories.len();
    let stats = DataStats {
        products: product_count as i64,
        categories: category_count as i64,
        total_size: outcome.size_bytes as i64,
    };
    let upload_time = outcome.upload_time_ms.map(|ms| ms as i64);
    let verify_time = outcome.verify_time_ms.map(|ms| ms as i64);

    if let Some(err) = outcome.error {
        let entry = NewPublishRecord::failed("Publish failed", err.to_string())
            .with_stats(stats)
            .with_timings(upload_time, verify_time);
        record_attempt(&state, entry).await;
        return Err(err.into());
    }

    let message = format!(
        "Published {} products and {} categories",
        product_count, category_count
    );
    let entry = NewPublishRecord::success(message.clone())
        .with_stats(stats)
        .with_timings(upload_time, verify_time);
    record_attempt(&state, entry).await;

    Ok(Json(PublishResponse {
        success: true,
        message,
        published_at: snapshot.published_at.clone().unwrap_or_default(),
        file_name: outcome.object_key,
        size: outcome.size_bytes,
        upload_time: outcome.upload_time_ms.unwrap_or_default(),
        verify_time: outcome.verify_time_ms.unwrap_or_default(),
        data_keys: top_level_keys(&snapshot),
        product_count,
        category_count,
        warnings,
        defaults_applied,
    }))
}

fn parse_draft(request: DraftRequest) -> Result<Snapshot, AppError> {
    let data = request
        .data
        .filter(|value| !value.is_null())
        .ok_or_else(|| AppError::BadRequest("No data provided".to_string()))?;

    serde_json::from_value(data)
        .map_err(|e| AppError::BadRequest(format!("Invalid catalog data: {}", e)))
}

// The history is advisory; failing to write it never fails the request.
async fn record_attempt(state: &AppState, entry: NewPublishRecord) {
    if let Err(e) = state.ledger.record(entry).await {
        tracing::warn!("Failed to record publish attempt: {}", e);
    }
}

fn top_level_keys(snapshot: &Snapshot) -> Vec<String> {
    match serde_json::to_value(snapshot) {
        Ok(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

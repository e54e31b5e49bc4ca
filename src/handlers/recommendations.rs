use axum::{
    extract::{Multipart, Query, State},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::models::SortOrder;
use crate::services::{ingest, recommendations};
use crate::AppState;

/// Bounds on the caller-supplied forecast horizon.
pub const MIN_HORIZON_DAYS: u32 = 7;
pub const MAX_HORIZON_DAYS: u32 = 180;

/// Query parameters accepted by the analyze endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeParams {
    /// Forward-looking forecast window in days (7-180); the configured
    /// default applies when omitted.
    pub horizon_days: Option<u32>,
    /// Output ordering; defaults to the input's first-seen SKU order.
    pub sort: Option<SortOrder>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(analyze))
}

/// Analyze an uploaded sales/inventory history and recommend reorders.
#[utoipa::path(
    post,
    path = "/api/v1/recommendations",
    params(AnalyzeParams),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "CSV sales/inventory history in a `file` field"
    ),
    responses(
        (status = 200, description = "Recommendations computed", body = crate::models::Analysis),
        (status = 400, description = "Missing required columns or invalid upload", body = crate::errors::ErrorResponse),
        (status = 413, description = "Uploaded file too large"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "recommendations"
)]
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let horizon_days = params
        .horizon_days
        .unwrap_or(state.config.default_horizon_days);
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        return Err(ApiError::Validation(format!(
            "horizon_days must be between {MIN_HORIZON_DAYS} and {MAX_HORIZON_DAYS}, got {horizon_days}"
        )));
    }

    let bytes = read_history_file(multipart).await?;
    let table = ingest::table_from_csv(&bytes)?;

    let today = Utc::now().date_naive();
    let analysis = recommendations::compute_recommendations(
        &table,
        horizon_days,
        today,
        params.sort.unwrap_or_default(),
    )?;

    tracing::info!(
        skus = analysis.recommendations.len(),
        warnings = analysis.warnings.len(),
        horizon_days,
        "history analyzed"
    );
    Ok(Json(analysis))
}

/// Pull the uploaded history out of the multipart body.
async fn read_history_file(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(format!("unreadable multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidUpload(format!("unreadable file field: {e}")))?;
            if bytes.is_empty() {
                return Err(ApiError::InvalidUpload("uploaded file is empty".to_string()));
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::InvalidUpload(
        "multipart body must include a `file` field".to_string(),
    ))
}

use axum::{
    extract::rejection::JsonRejection,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use lot_scout::{rows_to_csv, AnalysisRow};
use serde::Deserialize;

use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub rows: Option<Vec<AnalysisRow>>,
}

/// Render analysis rows as a CSV download.
pub async fn export_handler(
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let rows = request
        .rows
        .ok_or_else(|| ApiError::bad_request("Rows array required"))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"auction-analysis.csv\""),
        ],
        rows_to_csv(&rows),
    ))
}

use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use lot_scout::{AnalyzeOptions, ComparableResult};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ComparableItem {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparablesRequest {
    pub items: Option<Vec<ComparableItem>>,
    #[serde(flatten)]
    pub options: AnalyzeOptions,
}

#[derive(Debug, Serialize)]
pub struct ComparablesResponse {
    pub results: Vec<ComparableResult>,
}

/// Sold comparables for a list of titles, one result per item.
pub async fn ebay_sold_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<ComparablesRequest>, JsonRejection>,
) -> Result<Json<ComparablesResponse>, ApiError> {
    let Json(request) = body?;
    let items = request
        .items
        .ok_or_else(|| ApiError::bad_request("Items array required"))?;

    let titles = items.into_iter().map(|item| item.title).collect();
    let results = state
        .pipeline
        .lookup_comparables(titles, &request.options)
        .await;

    Ok(Json(ComparablesResponse { results }))
}

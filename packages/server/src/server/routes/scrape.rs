use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use lot_scout::{Lot, ScrapeStatus};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub source: &'static str,
    pub lots: Vec<Lot>,
    pub pages_fetched: usize,
    pub status: ScrapeStatus,
}

/// Scrape an auction listing without valuing it.
pub async fn scrape_auction_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Query(params) = params?;
    let url = params
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("URL parameter required"))?;

    let outcome = state
        .pipeline
        .scrape_auction(&url)
        .await
        .map_err(|e| ApiError::from_scout(e, "Failed to scrape auction"))?;

    Ok(Json(ScrapeResponse {
        source: outcome.site.id(),
        lots: outcome.lots,
        pages_fetched: outcome.pages_fetched,
        status: outcome.status,
    }))
}

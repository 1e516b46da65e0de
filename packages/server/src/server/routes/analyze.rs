use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use lot_scout::{AnalysisRow, AnalyzeOptions, ScrapeStatus};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub auction_url: Option<String>,
    #[serde(flatten)]
    pub options: AnalyzeOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub source: &'static str,
    pub rows: Vec<AnalysisRow>,
    pub scrape_status: ScrapeStatus,
}

/// Scrape an auction and value every lot.
pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = body?;
    let auction_url = request
        .auction_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("auctionUrl required"))?;

    let analysis = state
        .pipeline
        .analyze_auction(&auction_url, &request.options)
        .await
        .map_err(|e| ApiError::from_scout(e, "Analysis failed"))?;

    Ok(Json(AnalyzeResponse {
        source: analysis.site.id(),
        rows: analysis.rows,
        scrape_status: analysis.scrape_status,
    }))
}

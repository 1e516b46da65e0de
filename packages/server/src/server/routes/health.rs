use axum::{http::StatusCode, Json};
use lot_scout::AuctionSite;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    sites: Vec<&'static str>,
}

/// Health check endpoint
///
/// The service holds no connections, so it is healthy whenever it answers.
/// Lists the auction sites it can read.
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            sites: AuctionSite::ALL.iter().map(|site| site.id()).collect(),
        }),
    )
}

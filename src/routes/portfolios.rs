use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::AllocationEntry;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(portfolio_summary))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_value: f64,
    pub allocation: Vec<AllocationEntry>,
}

/// GET /api/portfolio
///
/// Total value plus per-holding allocation weights, in portfolio order.
pub async fn portfolio_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    info!("GET /api/portfolio - Portfolio summary");

    let portfolio = state.require_portfolio()?;
    let allocation = portfolio.allocation().ok_or_else(|| {
        AppError::InsufficientHistory("portfolio has zero total value".to_string())
    })?;

    Ok(Json(SummaryResponse {
        total_value: portfolio.total_value(),
        allocation,
    }))
}

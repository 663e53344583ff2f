use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::RiskProfile;
use crate::services::{price_service, risk_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/risk", get(portfolio_risk))
}

#[derive(Debug, Deserialize)]
pub struct RiskQueryParams {
    /// Lookback window in trading days (default: ~6 months)
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    126
}

/// GET /api/portfolio/risk
///
/// Risk metric suite over the aligned return series of the current
/// portfolio.
///
/// Example: GET /api/portfolio/risk?days=60
pub async fn portfolio_risk(
    Query(params): Query<RiskQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<RiskProfile>, AppError> {
    info!("GET /api/portfolio/risk - days={}", params.days);

    let portfolio = state.require_portfolio()?;
    let symbols = portfolio.symbols();

    let matrix = price_service::align_price_history(
        state.price_provider.as_ref(),
        &state.failure_cache,
        &symbols,
        params.days,
    )
    .await?;

    let profile = risk_service::compute_risk_profile(&matrix, &portfolio).map_err(|e| {
        warn!("risk computation failed: {}", e);
        e
    })?;

    Ok(Json(profile))
}

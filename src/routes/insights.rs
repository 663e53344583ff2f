use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::InsightReport;
use crate::routes::risk::RiskQueryParams;
use crate::services::{insight_service, price_service, risk_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/insights", get(portfolio_insights))
}

/// GET /api/portfolio/insights
///
/// Human-readable risk analysis. Enriched by the external text generator
/// when configured; otherwise (or on generator failure) the deterministic
/// rule-based fallback substitutes. The response is degraded, not an error.
pub async fn portfolio_insights(
    Query(params): Query<RiskQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<InsightReport>, AppError> {
    info!("GET /api/portfolio/insights - days={}", params.days);

    let portfolio = state.require_portfolio()?;
    let allocation = portfolio.allocation().ok_or_else(|| {
        AppError::InsufficientHistory("portfolio has zero total value".to_string())
    })?;

    let matrix = price_service::align_price_history(
        state.price_provider.as_ref(),
        &state.failure_cache,
        &portfolio.symbols(),
        params.days,
    )
    .await?;
    let profile = risk_service::compute_risk_profile(&matrix, &portfolio)?;

    let report = insight_service::generate_insights(
        state.text_generator.as_deref(),
        &portfolio,
        &allocation,
        &profile,
    )
    .await;

    Ok(Json(report))
}

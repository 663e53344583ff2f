use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, imports, insights, market, portfolios, risk, snapshots};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let portfolio_api = portfolios::router()
        .merge(imports::router())
        .merge(risk::router())
        .merge(insights::router())
        .merge(snapshots::router());

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/portfolio", portfolio_api)
        .nest("/api/market", market::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/context", get(market_context))
}

/// Global indices quoted for context alongside the portfolio.
const INDICES: [(&str, &str); 4] = [
    ("S&P 500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("Dow Jones", "^DJI"),
    ("NIFTY 50", "^NSEI"),
];

#[derive(Debug, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub trend: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum IndexEntry {
    Quote(IndexQuote),
    Unavailable { error: String },
}

#[derive(Debug, Serialize)]
pub struct MarketContextResponse {
    pub indices: BTreeMap<&'static str, IndexEntry>,
    pub timestamp: String,
}

/// GET /api/market/context
///
/// Latest close and day-over-day change for each index. A failed index
/// degrades to an error entry; the endpoint itself still succeeds.
pub async fn market_context(State(state): State<AppState>) -> Json<MarketContextResponse> {
    info!("GET /api/market/context - Quoting global indices");

    let mut indices = BTreeMap::new();
    for (name, symbol) in INDICES {
        let entry = match quote_index(state.price_provider.as_ref(), symbol).await {
            Ok(quote) => IndexEntry::Quote(quote),
            Err(e) => {
                warn!("index quote failed for {}: {}", symbol, e);
                IndexEntry::Unavailable {
                    error: e.to_string(),
                }
            }
        };
        indices.insert(name, entry);
    }

    Json(MarketContextResponse {
        indices,
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn quote_index(
    provider: &dyn PriceProvider,
    symbol: &str,
) -> Result<IndexQuote, PriceProviderError> {
    let history = provider.fetch_daily_closes(symbol, 5).await?;
    let latest = history
        .last()
        .ok_or_else(|| PriceProviderError::BadResponse("no history".into()))?
        .close;
    let previous = if history.len() > 1 {
        history[history.len() - 2].close
    } else {
        latest
    };

    let change_percent = (latest - previous) / previous * 100.0;
    Ok(IndexQuote {
        symbol: symbol.to_string(),
        current_price: latest,
        change_percent,
        trend: if change_percent > 0.0 { "up" } else { "down" },
    })
}

mod app;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::external::ledger::{HttpLedgerClient, LedgerClient, SimulatedLedger};
use crate::external::price_provider::PriceProvider;
use crate::external::text_generator::{OpenAiGenerator, TextGenerator};
use crate::external::yahoo::YahooProvider;
use crate::models::Portfolio;
use crate::services::portfolio_store::PortfolioStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(logging::LoggingConfig::from_env())?;

    let store = Arc::new(PortfolioStore::from_env());
    let initial = match store.load() {
        Ok(Some(portfolio)) => {
            tracing::info!("loaded persisted portfolio: {} holdings", portfolio.len());
            Arc::new(portfolio)
        }
        Ok(None) => Arc::new(Portfolio::default()),
        Err(e) => {
            tracing::warn!("could not load persisted portfolio, starting empty: {}", e);
            Arc::new(Portfolio::default())
        }
    };

    let price_provider: Arc<dyn PriceProvider> = Arc::new(YahooProvider::new());

    let text_generator: Option<Arc<dyn TextGenerator>> = match OpenAiGenerator::from_env() {
        Some(generator) => {
            tracing::info!("📊 Text generation enabled (OpenAI)");
            Some(Arc::new(generator))
        }
        None => {
            tracing::info!("📊 Text generation disabled; insights use the rule-based fallback");
            None
        }
    };

    let ledger: Arc<dyn LedgerClient> = match HttpLedgerClient::from_env() {
        Some(client) => {
            tracing::info!("📊 Ledger submission enabled");
            Arc::new(client)
        }
        None => {
            tracing::info!("📊 Ledger credentials not configured; running in simulation mode");
            Arc::new(SimulatedLedger)
        }
    };

    let state = AppState::new(initial, price_provider, text_generator, ledger, store);
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Riskledger backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

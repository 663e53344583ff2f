use parking_lot::RwLock;
use std::sync::Arc;

use crate::errors::AppError;
use crate::external::ledger::LedgerClient;
use crate::external::price_provider::PriceProvider;
use crate::external::text_generator::TextGenerator;
use crate::models::Portfolio;
use crate::services::failure_cache::FailureCache;
use crate::services::portfolio_store::PortfolioStore;

#[derive(Clone)]
pub struct AppState {
    /// Current portfolio behind an atomic-swap reference: readers clone the
    /// Arc and always see a complete, consistent snapshot; the single writer
    /// path (upload) replaces it wholesale.
    portfolio: Arc<RwLock<Arc<Portfolio>>>,
    pub price_provider: Arc<dyn PriceProvider>,
    pub text_generator: Option<Arc<dyn TextGenerator>>,
    pub ledger: Arc<dyn LedgerClient>,
    pub failure_cache: FailureCache,
    pub store: Arc<PortfolioStore>,
}

impl AppState {
    pub fn new(
        initial: Arc<Portfolio>,
        price_provider: Arc<dyn PriceProvider>,
        text_generator: Option<Arc<dyn TextGenerator>>,
        ledger: Arc<dyn LedgerClient>,
        store: Arc<PortfolioStore>,
    ) -> Self {
        Self {
            portfolio: Arc::new(RwLock::new(initial)),
            price_provider,
            text_generator,
            ledger,
            failure_cache: FailureCache::new(),
            store,
        }
    }

    pub fn current_portfolio(&self) -> Arc<Portfolio> {
        self.portfolio.read().clone()
    }

    /// Replace wholesale; never merges with the previous portfolio.
    pub fn replace_portfolio(&self, portfolio: Arc<Portfolio>) {
        *self.portfolio.write() = portfolio;
    }

    /// The current portfolio, or `NotFound` before the first upload.
    pub fn require_portfolio(&self) -> Result<Arc<Portfolio>, AppError> {
        let portfolio = self.current_portfolio();
        if portfolio.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(portfolio)
    }
}

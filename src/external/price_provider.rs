use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// One daily close as returned by a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Market-data collaborator boundary: symbol + lookback in, ascending
/// close-price series out. A symbol with no trading history yields an empty
/// series, not an error.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyClose>, PriceProviderError>;
}

use crate::external::price_provider::{DailyClose, PriceProvider, PriceProviderError};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

/// Daily close history via the Yahoo Finance chart API. Handles both plain
/// tickers and index symbols (`^GSPC` and friends).
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Vec<Option<f64>>,
}

/// Map a day count onto the ranges the chart API accepts.
fn range_for(days: u32) -> &'static str {
    if days <= 7 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 180 {
        "6mo"
    } else {
        "1y"
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyClose>, PriceProviderError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
            urlencode(symbol),
            range_for(days)
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }

        let body = resp
            .json::<ChartResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| PriceProviderError::BadResponse("missing result".into()))?;

        // timestamps align with the close list by index
        let closes = &result
            .indicators
            .quote
            .first()
            .ok_or_else(|| PriceProviderError::BadResponse("missing quote".into()))?
            .close;

        let mut out = Vec::new();
        for (i, ts) in result.timestamp.iter().enumerate() {
            // skip missing closes
            let Some(close) = closes.get(i).copied().flatten() else {
                continue;
            };
            let dt = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| PriceProviderError::Parse("bad timestamp".into()))?;
            out.push(DailyClose {
                date: dt.date_naive(),
                close,
            });
        }

        out.sort_by_key(|p| p.date);
        Ok(out)
    }
}

/// The only non-URL-safe character the index symbols carry is `^`.
fn urlencode(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}

use std::collections::BTreeMap;
use tracing::warn;

use crate::errors::AppError;
use crate::external::price_provider::{DailyClose, PriceProvider, PriceProviderError};
use crate::models::PriceMatrix;
use crate::services::failure_cache::{FailureCache, FailureKind};

/// Fetch each symbol's close history and align the series into one matrix.
///
/// Only dates on which every requested symbol has a close survive; a symbol
/// that yields no data at all therefore empties the whole matrix. That is a
/// deliberate simplification: completeness is traded for alignment
/// simplicity, and downstream turns an empty matrix into an
/// insufficient-history error.
pub async fn align_price_history(
    provider: &dyn PriceProvider,
    failures: &FailureCache,
    symbols: &[String],
    days: u32,
) -> Result<PriceMatrix, AppError> {
    let fetches = symbols
        .iter()
        .map(|symbol| fetch_one(provider, failures, symbol, days));
    let series = futures::future::join_all(fetches).await;

    Ok(align(
        symbols
            .iter()
            .cloned()
            .zip(series)
            .collect::<Vec<(String, Vec<DailyClose>)>>(),
    ))
}

/// One symbol's history, degraded to empty on failure. Failures are
/// recorded so the next request skips the symbol until the TTL expires.
async fn fetch_one(
    provider: &dyn PriceProvider,
    failures: &FailureCache,
    symbol: &str,
    days: u32,
) -> Vec<DailyClose> {
    if failures.should_skip(symbol) {
        warn!("skipping {}: recent fetch failure still cached", symbol);
        return Vec::new();
    }

    match provider.fetch_daily_closes(symbol, days).await {
        Ok(series) => {
            failures.clear(symbol);
            series
        }
        Err(e) => {
            let kind = match e {
                PriceProviderError::RateLimited => FailureKind::RateLimited,
                PriceProviderError::BadResponse(_) => FailureKind::NoData,
                _ => FailureKind::Upstream,
            };
            warn!("price fetch failed for {}: {}", symbol, e);
            failures.record(symbol, kind);
            Vec::new()
        }
    }
}

/// Intersect per-symbol series on date: rows with a missing value for any
/// symbol are dropped entirely, not imputed.
pub fn align(series: Vec<(String, Vec<DailyClose>)>) -> PriceMatrix {
    if series.is_empty() {
        return PriceMatrix::default();
    }

    let symbols: Vec<String> = series.iter().map(|(s, _)| s.clone()).collect();
    let by_date: Vec<BTreeMap<chrono::NaiveDate, f64>> = series
        .into_iter()
        .map(|(_, points)| points.into_iter().map(|p| (p.date, p.close)).collect())
        .collect();

    let mut dates = Vec::new();
    let mut closes = Vec::new();
    for date in by_date[0].keys() {
        let row: Option<Vec<f64>> = by_date.iter().map(|m| m.get(date).copied()).collect();
        if let Some(row) = row {
            dates.push(*date);
            closes.push(row);
        }
    }

    PriceMatrix {
        symbols,
        dates,
        closes,
    }
}

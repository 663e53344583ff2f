use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{Portfolio, PriceMatrix, RiskProfile};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const RISK_FREE_RATE: f64 = 0.05;

/// Compute the portfolio risk metric suite from aligned price history.
///
/// Degenerate inputs (zero total value, fewer than 2 daily returns) surface
/// as `InsufficientHistory`; no NaN ever reaches a reported metric.
pub fn compute_risk_profile(
    matrix: &PriceMatrix,
    portfolio: &Portfolio,
) -> Result<RiskProfile, AppError> {
    let weights = weight_vector(portfolio, &matrix.symbols)?;
    let series = portfolio_returns(matrix, &weights);

    if series.len() < 2 {
        return Err(AppError::InsufficientHistory(format!(
            "need at least 2 daily returns, got {} (aligned price rows: {})",
            series.len(),
            matrix.num_rows()
        )));
    }

    let volatility = sample_std(&series) * TRADING_DAYS_PER_YEAR.sqrt();
    let value_at_risk_95 = percentile(&series, 5.0);
    let max_drawdown = max_drawdown(&series);
    let mean_daily = series.iter().sum::<f64>() / series.len() as f64;
    let annual_return = mean_daily * TRADING_DAYS_PER_YEAR;
    let sharpe_ratio = if volatility > 0.0 {
        (annual_return - RISK_FREE_RATE) / volatility
    } else {
        0.0
    };

    Ok(RiskProfile {
        volatility,
        value_at_risk_95,
        max_drawdown,
        sharpe_ratio,
        annual_return,
    })
}

/// Allocation weights aligned to the matrix column order: per-symbol
/// `investment / total_investment`, zero for symbols absent from the matrix.
/// Duplicate holdings of a symbol contribute their summed investment.
pub fn weight_vector(portfolio: &Portfolio, matrix_symbols: &[String]) -> Result<Vec<f64>, AppError> {
    let total = portfolio.total_value();
    if total <= 0.0 {
        return Err(AppError::InsufficientHistory(
            "portfolio has zero total value".to_string(),
        ));
    }

    let mut by_symbol: HashMap<&str, f64> = HashMap::new();
    for h in &portfolio.holdings {
        *by_symbol.entry(h.symbol.as_str()).or_insert(0.0) += h.investment();
    }

    Ok(matrix_symbols
        .iter()
        .map(|s| by_symbol.get(s.as_str()).copied().unwrap_or(0.0) / total)
        .collect())
}

/// Simple percentage change between consecutive matrix rows; the first row
/// is dropped (undefined return).
pub fn daily_returns(matrix: &PriceMatrix) -> Vec<Vec<f64>> {
    matrix
        .closes
        .windows(2)
        .map(|rows| {
            rows[0]
                .iter()
                .zip(rows[1].iter())
                .map(|(prev, cur)| (cur - prev) / prev)
                .collect()
        })
        .collect()
}

/// Per-date weighted sum of per-symbol returns.
pub fn portfolio_returns(matrix: &PriceMatrix, weights: &[f64]) -> Vec<f64> {
    daily_returns(matrix)
        .iter()
        .map(|row| row.iter().zip(weights.iter()).map(|(r, w)| r * w).sum())
        .collect()
}

/// Sample (n−1) standard deviation.
fn sample_std(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Percentile with linear interpolation between order statistics.
fn percentile(xs: &[f64], pct: f64) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Minimum over the series of `cumprod(1+r) / runmax(cumprod(1+r)) - 1`.
/// The running maximum ranges over the cumulative products themselves, so
/// the result is always ≤ 0.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0;
    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = cumulative / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

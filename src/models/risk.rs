use serde::{Deserialize, Serialize};

/// Portfolio-level risk metrics over the aligned return series.
///
/// All values are expressed as fractions (0.25 for 25%), matching the raw
/// daily-return arithmetic they are derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Sample standard deviation of daily portfolio returns, annualized by √252
    pub volatility: f64,

    /// 5th percentile of daily portfolio returns (negative: the loss exceeded
    /// on the worst 5% of observed days)
    pub value_at_risk_95: f64,

    /// Largest peak-to-trough decline of cumulative value, always ≤ 0
    pub max_drawdown: f64,

    /// (annual return − risk-free rate) / volatility; 0 when volatility is 0
    pub sharpe_ratio: f64,

    /// Mean daily return × 252
    pub annual_return: f64,
}

use serde::Serialize;

/// How the explanation text was produced.
///
/// `Enriched` means the external text generator answered; `Degraded` means
/// the deterministic rule-based fallback substituted. Callers can tell a
/// degraded response from a failure outright.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", content = "text", rename_all = "snake_case")]
pub enum Explanation {
    Enriched(String),
    Degraded(String),
}

impl Explanation {
    pub fn is_enriched(&self) -> bool {
        matches!(self, Explanation::Enriched(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Explanation::Enriched(t) | Explanation::Degraded(t) => t,
        }
    }
}

/// Headline numbers reported alongside the explanation.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub volatility_pct: f64,
    pub max_single_position_pct: f64,
    pub total_assets: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub explanation: Explanation,
    pub risk_summary: RiskSummary,
}

use tracing::{info, warn};

use crate::external::text_generator::TextGenerator;
use crate::models::{AllocationEntry, Explanation, InsightReport, Portfolio, RiskProfile, RiskSummary};

/// Generate the human-readable insight report.
///
/// When a text generator is configured its output becomes the `Enriched`
/// explanation; when it is absent or fails, the deterministic rule-based
/// fallback substitutes as `Degraded`. Either way the report is a valid
/// response, never an error.
pub async fn generate_insights(
    generator: Option<&dyn TextGenerator>,
    portfolio: &Portfolio,
    allocation: &[AllocationEntry],
    profile: &RiskProfile,
) -> InsightReport {
    let max_weight = allocation.iter().map(|a| a.weight).fold(0.0, f64::max);

    let explanation = match generator {
        Some(g) => {
            let prompt = build_insight_prompt(portfolio, allocation, profile, max_weight);
            match g.summarize(prompt).await {
                Ok(text) => {
                    info!("insight generation succeeded");
                    Explanation::Enriched(text)
                }
                Err(e) => {
                    warn!("text generator failed, using rule-based fallback: {}", e);
                    Explanation::Degraded(fallback_after_error(profile, &e.to_string()))
                }
            }
        }
        None => Explanation::Degraded(rule_based_insights(portfolio, profile, max_weight)),
    };

    InsightReport {
        explanation,
        risk_summary: RiskSummary {
            volatility_pct: profile.volatility * 100.0,
            max_single_position_pct: max_weight * 100.0,
            total_assets: portfolio.len(),
        },
    }
}

/// Render the prompt the text-generation collaborator receives. The
/// collaborator is a black box: prompt in, free-text summary out.
fn build_insight_prompt(
    portfolio: &Portfolio,
    allocation: &[AllocationEntry],
    profile: &RiskProfile,
    max_weight: f64,
) -> String {
    let symbols = portfolio.symbols().join(", ");
    let allocation_lines: Vec<String> = allocation
        .iter()
        .map(|a| format!("- {}: {:.1}%", a.symbol, a.weight * 100.0))
        .collect();

    format!(
        r#"Analyze this investment portfolio and provide insights in simple, beginner-friendly language:

PORTFOLIO SUMMARY:
- Total Value: ₹{:.2}
- Number of Assets: {}
- Assets: {}
- Largest Holding: {:.1}% of portfolio

RISK METRICS:
- Annual Volatility: {:.2}%
- Value at Risk (95%): {:.2}%
- Maximum Drawdown: {:.2}%
- Sharpe Ratio: {:.2}

ALLOCATION:
{}

Please provide:
1. A brief risk assessment (low/medium/high) with explanation
2. What these metrics mean for a retail investor
3. 2-3 specific recommendations to improve the portfolio
4. Any concentration or diversification concerns

Keep the language simple and actionable. No jargon."#,
        portfolio.total_value(),
        portfolio.len(),
        symbols,
        max_weight * 100.0,
        profile.volatility * 100.0,
        profile.value_at_risk_95 * 100.0,
        profile.max_drawdown * 100.0,
        profile.sharpe_ratio,
        allocation_lines.join("\n"),
    )
}

/// Short fallback used when the generator was configured but the call failed.
fn fallback_after_error(profile: &RiskProfile, error: &str) -> String {
    format!(
        "AI service temporarily unavailable. Error: {}\n\nFallback analysis: Your portfolio shows {} risk with {:.2}% volatility. Consider diversification if concentration exceeds 30% in any asset.",
        error,
        risk_level(profile.volatility).to_lowercase(),
        profile.volatility * 100.0
    )
}

fn risk_level(volatility: f64) -> &'static str {
    if volatility > 0.3 {
        "High"
    } else if volatility > 0.15 {
        "Medium"
    } else {
        "Low"
    }
}

/// Deterministic rule-based insights used when no generator is configured.
fn rule_based_insights(portfolio: &Portfolio, profile: &RiskProfile, max_weight: f64) -> String {
    let level = risk_level(profile.volatility);
    let concentration_note = if max_weight > 0.3 {
        "High concentration risk detected!"
    } else {
        "Diversification looks reasonable."
    };

    format!(
        r#"RISK ASSESSMENT: {}

What this means:
Your portfolio has an annual volatility of {:.2}%. In a typical year, your portfolio value could swing up or down by this percentage.

The Value at Risk tells you that on the worst 5% of days, you might lose {:.2}% in a single day.

RECOMMENDATIONS:
1. {}
2. Your maximum drawdown of {:.2}% shows the biggest loss from peak. Consider whether you are comfortable with this.
3. Review whether all {} holdings align with your investment goals.

Note: configure a text-generation API key for AI-powered analysis."#,
        level,
        profile.volatility * 100.0,
        profile.value_at_risk_95.abs() * 100.0,
        concentration_note,
        profile.max_drawdown.abs() * 100.0,
        portfolio.len(),
    )
}

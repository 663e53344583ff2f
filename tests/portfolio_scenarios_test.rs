/// End-to-end property checks for the ingestion and risk pipeline.
///
/// The binary crate is not linkable from integration tests, so each module
/// mirrors the formula under test locally and pins down the contract the
/// service code must satisfy: allocation arithmetic, statement extraction
/// patterns, risk metric formulas, and snapshot hashing.

// ---------------------------------------------------------------------------
// Allocation & weights
// ---------------------------------------------------------------------------

#[cfg(test)]
mod allocation {
    fn weights(investments: &[f64]) -> Option<Vec<f64>> {
        let total: f64 = investments.iter().sum();
        if total <= 0.0 {
            return None;
        }
        Some(investments.iter().map(|v| v / total).collect())
    }

    #[test]
    fn test_two_asset_portfolio_weights() {
        // AAPL 10 @ 180.50 and MSFT 5 @ 420.00
        let investments = [10.0 * 180.50, 5.0 * 420.00];
        let total: f64 = investments.iter().sum();
        assert!((total - 3905.0).abs() < 1e-9);

        let w = weights(&investments).unwrap();
        assert!((w[0] - 0.46222791293213829).abs() < 1e-9);
        assert!((w[1] - 0.53777208706786171).abs() < 1e-9);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_value_portfolio_yields_no_weights() {
        assert!(weights(&[0.0, 0.0]).is_none());
    }
}

// ---------------------------------------------------------------------------
// Statement extraction patterns
// ---------------------------------------------------------------------------

#[cfg(test)]
mod statement_patterns {
    use regex::Regex;

    fn line_pattern() -> Regex {
        Regex::new(r"([A-Z]{2,5})\s+(\d+(?:\.\d+)?)\s+(\d+(?:\.\d+)?)").unwrap()
    }

    fn is_header(line: &str) -> bool {
        let lowered = line.to_lowercase();
        lowered.contains("symbol") || lowered.contains("isin")
    }

    #[test]
    fn test_whitespace_row_is_extracted_and_header_skipped() {
        let document = "Symbol Quantity Price\nAAPL    10    180.50\n";
        let rows: Vec<(String, f64, f64)> = document
            .lines()
            .filter(|l| !l.trim().is_empty() && !is_header(l))
            .filter_map(|l| {
                let caps = line_pattern().captures(l)?;
                Some((
                    caps[1].to_string(),
                    caps[2].parse().ok()?,
                    caps[3].parse().ok()?,
                ))
            })
            .collect();

        assert_eq!(rows, vec![("AAPL".to_string(), 10.0, 180.50)]);
    }

    #[test]
    fn test_pipe_row_acceptance_rules() {
        let accept = |line: &str| -> Option<(String, f64, f64)> {
            let parts: Vec<&str> = line.split('|').map(str::trim).collect();
            if parts.len() < 3 {
                return None;
            }
            let symbol = parts[0];
            if symbol.is_empty()
                || symbol.len() > 5
                || !symbol.chars().all(|c| c.is_alphabetic())
            {
                return None;
            }
            Some((symbol.to_string(), parts[1].parse().ok()?, parts[2].parse().ok()?))
        };

        assert_eq!(
            accept("MSFT | 5 | 420.00"),
            Some(("MSFT".to_string(), 5.0, 420.0))
        );
        assert_eq!(accept("TOOLONG | 5 | 420.00"), None);
        assert_eq!(accept("MS4T | 5 | 420.00"), None);
        assert_eq!(accept("MSFT | 5"), None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = "AAPL 10 180.50\nMSFT 5 420.00\n";
        let run = || -> Vec<String> {
            document
                .lines()
                .filter_map(|l| line_pattern().captures(l).map(|c| c[1].to_string()))
                .collect()
        };
        assert_eq!(run(), run());
        assert_eq!(run(), vec!["AAPL", "MSFT"]);
    }
}

// ---------------------------------------------------------------------------
// Risk metric formulas
// ---------------------------------------------------------------------------

#[cfg(test)]
mod risk_metrics {
    fn daily_returns(prices: &[f64]) -> Vec<f64> {
        prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
    }

    fn sample_std(xs: &[f64]) -> f64 {
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        (xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    }

    fn max_drawdown(returns: &[f64]) -> f64 {
        let mut cumulative = 1.0;
        let mut peak = f64::NEG_INFINITY;
        let mut worst: f64 = 0.0;
        for r in returns {
            cumulative *= 1.0 + r;
            peak = peak.max(cumulative);
            worst = worst.min(cumulative / peak - 1.0);
        }
        worst
    }

    fn percentile(xs: &[f64], pct: f64) -> f64 {
        let mut sorted = xs.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let rank = pct / 100.0 * (sorted.len() - 1) as f64;
        let (lo, hi) = (rank.floor() as usize, rank.ceil() as usize);
        if lo == hi {
            sorted[lo]
        } else {
            sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }

    #[test]
    fn test_single_price_point_gives_empty_return_series() {
        // One close ⇒ zero returns ⇒ the service must report insufficient
        // history instead of producing NaN metrics.
        assert!(daily_returns(&[180.50]).is_empty());
    }

    #[test]
    fn test_volatility_is_non_negative_and_annualized() {
        let returns = daily_returns(&[100.0, 110.0, 99.0, 104.0]);
        let annualized = sample_std(&returns) * 252.0_f64.sqrt();
        assert!(annualized >= 0.0);
        assert!(annualized > sample_std(&returns));
    }

    #[test]
    fn test_max_drawdown_is_never_positive() {
        assert!(max_drawdown(&[0.05, -0.10, 0.02, 0.08]) <= 0.0);
        assert_eq!(max_drawdown(&[0.01, 0.02]), 0.0);
    }

    #[test]
    fn test_var_95_sits_in_the_left_tail() {
        let returns: Vec<f64> = (0..100).map(|i| (i as f64 - 50.0) / 1000.0).collect();
        let var = percentile(&returns, 5.0);
        assert!(var < 0.0);
        // At most ~5% of observations fall below the 5th percentile.
        let below = returns.iter().filter(|r| **r < var).count();
        assert!(below <= 5);
    }

    #[test]
    fn test_sharpe_is_zero_when_volatility_is_zero() {
        let annual_return = 0.0;
        let volatility = 0.0_f64;
        let sharpe = if volatility > 0.0 {
            (annual_return - 0.05) / volatility
        } else {
            0.0
        };
        assert_eq!(sharpe, 0.0);
    }
}

// ---------------------------------------------------------------------------
// Snapshot hashing
// ---------------------------------------------------------------------------

#[cfg(test)]
mod snapshot_hashing {
    use serde_json::json;
    use sha2::{Digest, Sha256};

    fn canonical(holdings: &[(&str, f64, f64)], timestamp: &str) -> String {
        let rows: Vec<serde_json::Value> = holdings
            .iter()
            .map(|(s, q, p)| json!({"symbol": s, "quantity": q, "price": p}))
            .collect();
        let total: f64 = holdings.iter().map(|(_, q, p)| q * p).sum();
        json!({"holdings": rows, "total_value": total, "timestamp": timestamp}).to_string()
    }

    fn digest(canonical: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }

    const TS: &str = "2024-06-01T12:00:00.000000Z";

    #[test]
    fn test_serialization_emits_sorted_keys() {
        let s = canonical(&[("AAPL", 10.0, 180.50)], TS);
        assert!(s.starts_with("{\"holdings\":[{\"price\":180.5,\"quantity\":10.0,\"symbol\":\"AAPL\"}]"));
        let holdings_pos = s.find("\"holdings\"").unwrap();
        let timestamp_pos = s.find("\"timestamp\"").unwrap();
        let total_pos = s.find("\"total_value\"").unwrap();
        assert!(holdings_pos < timestamp_pos && timestamp_pos < total_pos);
    }

    #[test]
    fn test_digest_is_a_pure_function_of_inputs() {
        let a = digest(&canonical(&[("AAPL", 10.0, 180.50)], TS));
        let b = digest(&canonical(&[("AAPL", 10.0, 180.50)], TS));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_every_field_and_the_order_affect_the_digest() {
        let base = digest(&canonical(&[("AAPL", 10.0, 180.50), ("MSFT", 5.0, 420.0)], TS));

        let variants = [
            canonical(&[("AAPL", 11.0, 180.50), ("MSFT", 5.0, 420.0)], TS),
            canonical(&[("AAPL", 10.0, 180.51), ("MSFT", 5.0, 420.0)], TS),
            canonical(&[("AAPX", 10.0, 180.50), ("MSFT", 5.0, 420.0)], TS),
            canonical(&[("MSFT", 5.0, 420.0), ("AAPL", 10.0, 180.50)], TS),
            canonical(
                &[("AAPL", 10.0, 180.50), ("MSFT", 5.0, 420.0)],
                "2024-06-01T12:00:00.000001Z",
            ),
        ];
        for v in variants {
            assert_ne!(digest(&v), base);
        }
    }
}

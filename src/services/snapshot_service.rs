use serde_json::json;
use sha2::{Digest, Sha256};

use crate::models::{Portfolio, Snapshot};

/// Ledger note fields are capped around 1KB; the canonical payload is
/// truncated to fit.
const NOTE_LIMIT: usize = 1000;

/// Canonical serialization of portfolio state: object keys in lexicographic
/// order (serde_json's default map is BTree-backed), holdings array in
/// portfolio order, floats in serde_json's shortest-roundtrip encoding.
/// Byte-identical for identical inputs across runs and processes.
pub fn canonical_form(portfolio: &Portfolio, timestamp: &str) -> String {
    let holdings: Vec<serde_json::Value> = portfolio
        .holdings
        .iter()
        .map(|h| {
            json!({
                "symbol": h.symbol,
                "quantity": h.quantity,
                "price": h.price,
            })
        })
        .collect();

    json!({
        "holdings": holdings,
        "total_value": portfolio.total_value(),
        "timestamp": timestamp,
    })
    .to_string()
}

/// SHA-256 over the UTF-8 bytes of the canonical form, lowercase hex.
pub fn digest_hex(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the tamper-evident snapshot of the portfolio at `timestamp`.
///
/// The timestamp is embedded in the hashed form: two snapshots of identical
/// holdings taken at different times always differ. The snapshot is a
/// point-in-time attestation, not a content-only fingerprint.
pub fn build_snapshot(portfolio: &Portfolio, timestamp: &str) -> Snapshot {
    let canonical = canonical_form(portfolio, timestamp);
    let digest = digest_hex(&canonical);

    Snapshot {
        digest,
        timestamp: timestamp.to_string(),
        total_value: portfolio.total_value(),
        num_holdings: portfolio.len(),
        symbols: portfolio.holdings.iter().map(|h| h.symbol.clone()).collect(),
        note_payload: truncate_on_char_boundary(&canonical, NOTE_LIMIT),
    }
}

fn truncate_on_char_boundary(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Holding;

    const TS: &str = "2024-06-01T12:00:00.000000Z";

    fn sample_portfolio() -> Portfolio {
        Portfolio::new(vec![
            Holding::new("AAPL", 10.0, 180.50),
            Holding::new("MSFT", 5.0, 420.00),
        ])
    }

    #[test]
    fn test_canonical_form_sorts_keys() {
        let p = Portfolio::new(vec![Holding::new("AAPL", 10.0, 180.50)]);
        assert_eq!(
            canonical_form(&p, TS),
            format!(
                "{{\"holdings\":[{{\"price\":180.5,\"quantity\":10.0,\"symbol\":\"AAPL\"}}],\
                 \"timestamp\":\"{}\",\"total_value\":1805.0}}",
                TS
            )
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = build_snapshot(&sample_portfolio(), TS);
        let b = build_snapshot(&sample_portfolio(), TS);
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.digest.len(), 64);
        assert!(a.digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_any_single_change_alters_the_digest() {
        let base = build_snapshot(&sample_portfolio(), TS).digest;

        let mut quantity = sample_portfolio();
        quantity.holdings[0].quantity = 11.0;
        assert_ne!(build_snapshot(&quantity, TS).digest, base);

        let mut price = sample_portfolio();
        price.holdings[1].price = 421.0;
        assert_ne!(build_snapshot(&price, TS).digest, base);

        let mut symbol = sample_portfolio();
        symbol.holdings[0].symbol = "AAPLX".to_string();
        assert_ne!(build_snapshot(&symbol, TS).digest, base);

        let mut order = sample_portfolio();
        order.holdings.reverse();
        assert_ne!(build_snapshot(&order, TS).digest, base);

        assert_ne!(
            build_snapshot(&sample_portfolio(), "2024-06-01T12:00:01.000000Z").digest,
            base
        );
    }

    #[test]
    fn test_note_payload_is_bounded() {
        let holdings = (0..200)
            .map(|i| Holding::new(format!("SYM{}", i % 10), i as f64, 100.0))
            .collect();
        let portfolio = Portfolio::new(holdings);
        let snapshot = build_snapshot(&portfolio, TS);
        assert!(snapshot.note_payload.len() <= 1000);
        assert!(canonical_form(&portfolio, TS).starts_with(&snapshot.note_payload));
    }

    #[test]
    fn test_snapshot_reports_symbols_in_order() {
        let snapshot = build_snapshot(&sample_portfolio(), TS);
        assert_eq!(snapshot.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(snapshot.num_holdings, 2);
        assert!((snapshot.total_value - 3905.0).abs() < 1e-9);
    }
}

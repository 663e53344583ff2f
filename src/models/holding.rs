use serde::{Deserialize, Serialize};

/// One portfolio position.
///
/// The invested amount is always derived as `quantity * price`. Uploads that
/// carry their own investment column have it recomputed, never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
        }
    }

    pub fn investment(&self) -> f64 {
        self.quantity * self.price
    }
}

/// The current set of holdings, in upload order.
///
/// Order is significant: snapshot hashing and reporting preserve it.
/// Duplicate symbols stay as separate rows and are never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

/// One row of the portfolio summary: a holding's share of total value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub symbol: String,
    pub weight: f64,
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::investment).sum()
    }

    /// Distinct symbols in first-seen order.
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for h in &self.holdings {
            if !seen.contains(&h.symbol) {
                seen.push(h.symbol.clone());
            }
        }
        seen
    }

    /// Per-row allocation weights. `None` when total value is zero, so no
    /// caller can end up dividing by zero.
    pub fn allocation(&self) -> Option<Vec<AllocationEntry>> {
        let total = self.total_value();
        if total <= 0.0 {
            return None;
        }
        Some(
            self.holdings
                .iter()
                .map(|h| AllocationEntry {
                    symbol: h.symbol.clone(),
                    weight: h.investment() / total,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_is_derived() {
        let h = Holding::new("AAPL", 10.0, 180.50);
        assert!((h.investment() - 1805.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_value_sums_rows() {
        let p = Portfolio::new(vec![
            Holding::new("AAPL", 10.0, 180.50),
            Holding::new("MSFT", 5.0, 420.00),
        ]);
        assert!((p.total_value() - 3905.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_weights_sum_to_one() {
        let p = Portfolio::new(vec![
            Holding::new("AAPL", 10.0, 180.50),
            Holding::new("MSFT", 5.0, 420.00),
        ]);
        let allocation = p.allocation().unwrap();
        let sum: f64 = allocation.iter().map(|a| a.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((allocation[0].weight - 1805.0 / 3905.0).abs() < 1e-9);
        assert!((allocation[1].weight - 2100.0 / 3905.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_refuses_zero_total() {
        let p = Portfolio::new(vec![Holding::new("AAPL", 0.0, 180.50)]);
        assert!(p.allocation().is_none());
    }

    #[test]
    fn test_duplicate_symbols_are_not_merged() {
        let p = Portfolio::new(vec![
            Holding::new("AAPL", 1.0, 100.0),
            Holding::new("AAPL", 2.0, 100.0),
        ]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.symbols(), vec!["AAPL".to_string()]);
    }
}

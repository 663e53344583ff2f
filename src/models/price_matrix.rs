use chrono::NaiveDate;
use serde::Serialize;

/// Close prices for a set of symbols, restricted to dates on which every
/// symbol has a value. Rows with any missing symbol are dropped during
/// alignment, never imputed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceMatrix {
    /// Column order; the weight vector is aligned against this.
    pub symbols: Vec<String>,
    /// Ascending row index.
    pub dates: Vec<NaiveDate>,
    /// `closes[i][j]` is the close of `symbols[j]` on `dates[i]`.
    pub closes: Vec<Vec<f64>>,
}

impl PriceMatrix {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }
}

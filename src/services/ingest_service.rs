use csv::ReaderBuilder;
use std::sync::Arc;
use tracing::info;

use crate::errors::AppError;
use crate::models::{Holding, Portfolio};
use crate::services::statement_parser;
use crate::state::AppState;

/// Which input path produced the holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Tabular,
    Statement,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Tabular => "CSV",
            SourceKind::Statement => "Statement (CAS)",
        }
    }
}

/// Normalize an upload into holdings, routing by file extension: `.csv`
/// goes down the tabular path, statement documents (`.txt`, `.pdf`) through
/// the heuristic text parser. All-or-nothing: any failure leaves the
/// committed portfolio untouched.
pub fn normalize(filename: &str, raw: &[u8]) -> Result<(SourceKind, Vec<Holding>), AppError> {
    let lowered = filename.to_lowercase();
    if lowered.ends_with(".csv") {
        Ok((SourceKind::Tabular, parse_tabular(raw)?))
    } else if lowered.ends_with(".txt") || lowered.ends_with(".pdf") {
        Ok((SourceKind::Statement, statement_parser::parse_statement(raw)?))
    } else {
        Err(AppError::Parse(format!(
            "Unsupported file type: {}. Please upload CSV or a statement document.",
            filename
        )))
    }
}

/// Parse headered tabular rows. An `investment` column, if present, is
/// ignored; the value is always recomputed from quantity and price.
pub fn parse_tabular(raw: &[u8]) -> Result<Vec<Holding>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw);

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, AppError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::MissingField(name.to_string()))
    };
    let symbol_col = column("symbol")?;
    let quantity_col = column("quantity")?;
    let price_col = column("price")?;

    let mut holdings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symbol = record
            .get(symbol_col)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::MissingField("symbol".to_string()))?;
        let quantity = parse_number(record.get(quantity_col), "quantity")?;
        let price = parse_number(record.get(price_col), "price")?;
        holdings.push(Holding::new(symbol, quantity, price));
    }
    Ok(holdings)
}

/// An absent or empty cell is a missing field; a non-numeric one is a parse
/// failure carrying the original message.
fn parse_number(field: Option<&str>, name: &str) -> Result<f64, AppError> {
    let field = field
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingField(name.to_string()))?;
    field
        .parse::<f64>()
        .map_err(|e| AppError::Parse(format!("invalid {} '{}': {}", name, field, e)))
}

/// Replace the current portfolio wholesale: persist first, then swap the
/// in-memory reference so readers never observe a portfolio that was not
/// also written out.
pub fn commit(state: &AppState, holdings: Vec<Holding>) -> Result<Arc<Portfolio>, AppError> {
    let portfolio = Arc::new(Portfolio::new(holdings));
    state
        .store
        .save(&portfolio)
        .map_err(|e| AppError::Storage(e.to_string()))?;
    state.replace_portfolio(Arc::clone(&portfolio));
    info!(
        "committed portfolio: {} holdings, total value {:.2}",
        portfolio.len(),
        portfolio.total_value()
    );
    Ok(portfolio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabular_rows_are_parsed() {
        let csv = b"symbol,quantity,price\nAAPL,10,180.50\nMSFT,5,420.00\n";
        let holdings = parse_tabular(csv).unwrap();
        assert_eq!(
            holdings,
            vec![
                Holding::new("AAPL", 10.0, 180.50),
                Holding::new("MSFT", 5.0, 420.0),
            ]
        );
    }

    #[test]
    fn test_investment_column_is_ignored() {
        let csv = b"symbol,quantity,price,investment\nAAPL,10,180.50,999999\n";
        let holdings = parse_tabular(csv).unwrap();
        assert!((holdings[0].investment() - 1805.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column_fails_whole_parse() {
        let csv = b"symbol,quantity\nAAPL,10\n";
        let err = parse_tabular(csv).unwrap_err();
        assert!(matches!(err, AppError::MissingField(ref c) if c == "price"));
    }

    #[test]
    fn test_malformed_number_is_a_parse_error() {
        let csv = b"symbol,quantity,price\nAAPL,ten,180.50\n";
        let err = parse_tabular(csv).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_empty_cell_is_a_missing_field() {
        let csv = b"symbol,quantity,price\nAAPL,,180.50\n";
        let err = parse_tabular(csv).unwrap_err();
        assert!(matches!(err, AppError::MissingField(ref c) if c == "quantity"));

        let csv = b"symbol,quantity,price\n,10,180.50\n";
        let err = parse_tabular(csv).unwrap_err();
        assert!(matches!(err, AppError::MissingField(ref c) if c == "symbol"));
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let csv = b"Symbol,Quantity,Price\nAAPL,10,180.50\n";
        assert_eq!(parse_tabular(csv).unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = normalize("holdings.xlsx", b"whatever").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_statement_route_by_extension() {
        let (kind, holdings) = normalize("cas.txt", b"AAPL 10 180.50\n").unwrap();
        assert_eq!(kind, SourceKind::Statement);
        assert_eq!(holdings.len(), 1);
    }
}

use regex::Regex;
use tracing::debug;

use crate::errors::AppError;
use crate::models::Holding;

/// Extraction strategies for unstructured statement documents, tried in
/// fixed order. The first strategy to yield any rows wins for the whole
/// document; Strategy B only runs when Strategy A found nothing at all.
///
/// Broker statement layouts are not drawn from a fixed grammar, so the chain
/// is greedy and order-sensitive: partial extraction is acceptable, total
/// failure only when nothing recognizable is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Strict UTF-8 text, whitespace pattern plus pipe-delimited fields.
    LineScan,
    /// Lossy re-decode of the raw bytes, whitespace pattern only.
    LossyLineScan,
}

pub const STRATEGY_CHAIN: [Strategy; 2] = [Strategy::LineScan, Strategy::LossyLineScan];

/// Recover (symbol, quantity, price) rows from a statement document.
///
/// Rows come back in document order: page, then line, then match order.
/// Parsing the same bytes twice yields the same rows.
pub fn parse_statement(raw: &[u8]) -> Result<Vec<Holding>, AppError> {
    for strategy in STRATEGY_CHAIN {
        let rows = run_strategy(strategy, raw);
        if !rows.is_empty() {
            debug!("statement parser: {:?} extracted {} rows", strategy, rows.len());
            return Ok(rows);
        }
    }
    Err(AppError::NoHoldingsFound)
}

/// Run a single strategy in isolation.
pub fn run_strategy(strategy: Strategy, raw: &[u8]) -> Vec<Holding> {
    match strategy {
        Strategy::LineScan => match std::str::from_utf8(raw) {
            Ok(text) => scan_pages(text, true),
            Err(_) => Vec::new(),
        },
        Strategy::LossyLineScan => scan_pages(&String::from_utf8_lossy(raw), false),
    }
}

/// Walk pages (form-feed separated) and lines, collecting at most one row
/// per line. Header lines naming "symbol" or "isin" are skipped.
fn scan_pages(text: &str, allow_pipes: bool) -> Vec<Holding> {
    // Example: "AAPL    10    180.50"
    let pattern = Regex::new(r"([A-Z]{2,5})\s+(\d+(?:\.\d+)?)\s+(\d+(?:\.\d+)?)").unwrap();

    let mut rows = Vec::new();
    for page in text.split('\x0c') {
        for line in page.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let lowered = line.to_lowercase();
            if lowered.contains("symbol") || lowered.contains("isin") {
                continue;
            }

            // Sub-pattern 1: first match wins, remainder of the line ignored.
            if let Some(caps) = pattern.captures(line) {
                if let (Ok(quantity), Ok(price)) =
                    (caps[2].parse::<f64>(), caps[3].parse::<f64>())
                {
                    rows.push(Holding::new(&caps[1], quantity, price));
                    continue;
                }
            }

            // Sub-pattern 2: pipe-delimited fields. Example: "MSFT | 5 | 420.00"
            if allow_pipes {
                if let Some(row) = parse_pipe_fields(line) {
                    rows.push(row);
                }
            }
        }
    }
    rows
}

/// Accepts a pipe-delimited line only when there are at least 3 fields, the
/// first is purely alphabetic and at most 5 chars, and fields 2 and 3 parse
/// as numbers.
fn parse_pipe_fields(line: &str) -> Option<Holding> {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let symbol = parts[0];
    if symbol.is_empty() || symbol.len() > 5 || !symbol.chars().all(|c| c.is_alphabetic()) {
        return None;
    }
    let quantity = parts[1].parse::<f64>().ok()?;
    let price = parts[2].parse::<f64>().ok()?;
    Some(Holding::new(symbol, quantity, price))
}

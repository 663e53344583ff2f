use serde::Serialize;

/// Canonical portfolio state at a point in time, plus its digest.
///
/// The digest is a pure function of (holdings order + values, timestamp):
/// identical inputs always reproduce it, and changing any single quantity,
/// price, symbol, ordering, or the timestamp changes it.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// SHA-256 over the UTF-8 bytes of the canonical serialization, hex
    pub digest: String,
    pub timestamp: String,
    pub total_value: f64,
    pub num_holdings: usize,
    /// Holding symbols in portfolio order
    pub symbols: Vec<String>,
    /// Leading slice of the canonical serialization, sized for a ledger note
    pub note_payload: String,
}

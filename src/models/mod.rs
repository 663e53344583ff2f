mod holding;
mod insight;
mod price_matrix;
mod risk;
mod snapshot;

pub use holding::{AllocationEntry, Holding, Portfolio};
pub use insight::{Explanation, InsightReport, RiskSummary};
pub use price_matrix::PriceMatrix;
pub use risk::RiskProfile;
pub use snapshot::Snapshot;

pub mod failure_cache;
pub mod ingest_service;
pub mod insight_service;
pub mod portfolio_store;
pub mod price_service;
pub mod risk_service;
pub mod snapshot_service;
pub mod statement_parser;

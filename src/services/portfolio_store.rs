use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::models::{Holding, Portfolio};

/// Flat-file persistence for the current portfolio: a headered
/// `symbol,quantity,price` CSV, rewritten wholesale on each successful
/// upload and reloaded on startup.
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = std::env::var("PORTFOLIO_FILE")
            .unwrap_or_else(|_| "data/portfolio.csv".to_string());
        Self::new(path)
    }

    /// `Ok(None)` when no portfolio has ever been saved.
    pub fn load(&self) -> Result<Option<Portfolio>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let holdings = crate::services::ingest_service::parse_tabular(&raw)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(Portfolio::new(holdings)))
    }

    pub fn save(&self, portfolio: &Portfolio) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writer.write_record(["symbol", "quantity", "price"])?;
        for Holding {
            symbol,
            quantity,
            price,
        } in &portfolio.holdings
        {
            writer.write_record(&[symbol.clone(), quantity.to_string(), price.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> PortfolioStore {
        let path = std::env::temp_dir().join(format!("riskledger-{}-{}.csv", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        PortfolioStore::new(path)
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = temp_store("roundtrip");
        let portfolio = Portfolio::new(vec![
            Holding::new("AAPL", 10.0, 180.50),
            Holding::new("MSFT", 5.0, 420.0),
        ]);
        store.save(&portfolio).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.holdings, portfolio.holdings);
    }
}

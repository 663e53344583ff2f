use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Metadata anchored alongside the snapshot digest.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNote {
    pub snapshot_hash: String,
    pub timestamp: String,
    pub total_value: f64,
    pub num_holdings: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    /// Anchored on the real ledger
    Submitted,
    /// Credentials absent; locally simulated identifier
    Simulation,
    /// Real submission failed; the receipt is still a valid response
    Error,
}

/// Outcome of a ledger submission. Always a valid response body: a failed
/// real submission degrades to an `Error`-status receipt instead of aborting
/// the request.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReceipt {
    pub status: LedgerStatus,
    pub tx_id: Option<String>,
    pub explorer_link: Option<String>,
    pub message: String,
}

impl LedgerReceipt {
    pub fn failed(message: String) -> Self {
        Self {
            status: LedgerStatus::Error,
            tx_id: None,
            explorer_link: None,
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// Ledger collaborator boundary: digest + metadata in, transaction id (or
/// simulated id) out. The core never blocks on confirmation beyond what the
/// collaborator itself guarantees.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit(
        &self,
        digest: &str,
        note: &SnapshotNote,
    ) -> Result<LedgerReceipt, LedgerError>;
}

#[derive(Debug, Deserialize)]
struct AnchorResponse {
    tx_id: String,
    #[serde(default)]
    explorer_link: Option<String>,
}

/// Posts the digest + note to a configured anchor service.
pub struct HttpLedgerClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpLedgerClient {
    /// `None` unless both `LEDGER_URL` and `LEDGER_TOKEN` are set; ledger
    /// submission then runs in simulation mode.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("LEDGER_URL").ok()?;
        let token = std::env::var("LEDGER_TOKEN").ok()?;
        if base_url.trim().is_empty() || token.trim().is_empty() {
            return None;
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Some(Self {
            base_url,
            token,
            client,
        })
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit(
        &self,
        digest: &str,
        note: &SnapshotNote,
    ) -> Result<LedgerReceipt, LedgerError> {
        let url = format!("{}/v1/anchors", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "digest": digest,
            "note": note,
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LedgerError::BadResponse(format!(
                "status {}",
                resp.status()
            )));
        }

        let anchor = resp
            .json::<AnchorResponse>()
            .await
            .map_err(|e| LedgerError::BadResponse(e.to_string()))?;

        Ok(LedgerReceipt {
            status: LedgerStatus::Submitted,
            tx_id: Some(anchor.tx_id),
            explorer_link: anchor.explorer_link,
            message: "Portfolio snapshot anchored to ledger".to_string(),
        })
    }
}

/// Stand-in used when ledger credentials are not configured. The simulated
/// id is deterministic: `SIM` + the digest's first 16 hex chars.
pub struct SimulatedLedger;

#[async_trait]
impl LedgerClient for SimulatedLedger {
    async fn submit(
        &self,
        digest: &str,
        _note: &SnapshotNote,
    ) -> Result<LedgerReceipt, LedgerError> {
        let prefix: String = digest.chars().take(16).collect();
        Ok(LedgerReceipt {
            status: LedgerStatus::Simulation,
            tx_id: Some(format!("SIM{}", prefix)),
            explorer_link: None,
            message: "Ledger credentials not configured. Running in simulation mode.".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_receipt_uses_digest_prefix() {
        let note = SnapshotNote {
            snapshot_hash: "ab".repeat(32),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            total_value: 3905.0,
            num_holdings: 2,
        };
        let receipt = SimulatedLedger
            .submit(&note.snapshot_hash, &note)
            .await
            .unwrap();

        assert_eq!(receipt.status, LedgerStatus::Simulation);
        assert_eq!(receipt.tx_id.as_deref(), Some("SIMabababababababab"));
    }
}

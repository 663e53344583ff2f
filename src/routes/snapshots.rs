use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::ledger::{LedgerReceipt, SnapshotNote};
use crate::models::Snapshot;
use crate::services::snapshot_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/snapshot", get(portfolio_snapshot))
        .route("/snapshot/submit", post(submit_snapshot))
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_hash: String,
    pub timestamp: String,
    pub total_value: f64,
    pub num_holdings: usize,
    pub holdings: Vec<String>,
    pub ledger_ready: LedgerReady,
}

#[derive(Debug, Serialize)]
pub struct LedgerReady {
    pub note_field: String,
    pub hash: String,
    pub status: &'static str,
}

impl From<Snapshot> for SnapshotResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            ledger_ready: LedgerReady {
                note_field: snapshot.note_payload,
                hash: snapshot.digest.clone(),
                status: "Ready for ledger submission",
            },
            snapshot_hash: snapshot.digest,
            timestamp: snapshot.timestamp,
            total_value: snapshot.total_value,
            num_holdings: snapshot.num_holdings,
            holdings: snapshot.symbols,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub snapshot: SnapshotResponse,
    pub ledger_submission: LedgerReceipt,
}

/// GET /api/portfolio/snapshot
///
/// Tamper-evident SHA-256 fingerprint of the current portfolio state. The
/// timestamp is part of the hashed form: a snapshot is a point-in-time
/// attestation.
pub async fn portfolio_snapshot(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, AppError> {
    info!("GET /api/portfolio/snapshot - Fingerprinting portfolio");

    let portfolio = state.require_portfolio()?;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let snapshot = snapshot_service::build_snapshot(&portfolio, &timestamp);

    Ok(Json(snapshot.into()))
}

/// POST /api/portfolio/snapshot/submit
///
/// Anchor the current snapshot digest on the ledger. A failed real
/// submission degrades to an error-status receipt; the snapshot itself is
/// always returned.
pub async fn submit_snapshot(
    State(state): State<AppState>,
) -> Result<Json<SubmitResponse>, AppError> {
    info!("POST /api/portfolio/snapshot/submit - Anchoring snapshot");

    let portfolio = state.require_portfolio()?;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let snapshot = snapshot_service::build_snapshot(&portfolio, &timestamp);

    let note = SnapshotNote {
        snapshot_hash: snapshot.digest.clone(),
        timestamp: snapshot.timestamp.clone(),
        total_value: snapshot.total_value,
        num_holdings: snapshot.num_holdings,
    };
    let receipt = match state.ledger.submit(&snapshot.digest, &note).await {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!("ledger submission failed: {}", e);
            LedgerReceipt::failed(format!("Failed to submit to ledger: {}", e))
        }
    };

    Ok(Json(SubmitResponse {
        snapshot: snapshot.into(),
        ledger_submission: receipt,
    }))
}

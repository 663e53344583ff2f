use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::Holding;
use crate::services::ingest_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_portfolio))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_type: &'static str,
    pub total_investment: f64,
    pub num_holdings: usize,
    pub assets: Vec<Holding>,
}

/// POST /api/portfolio/upload
///
/// Upload the portfolio from a CSV or a statement document (multipart field
/// `file`). On success the previous portfolio is replaced wholesale; on any
/// failure it is left untouched.
pub async fn upload_portfolio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Parse(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Parse(e.to_string()))?;
            upload = Some((filename, data.to_vec()));
        }
    }

    let (filename, raw) = upload
        .ok_or_else(|| AppError::Parse("missing multipart field 'file'".to_string()))?;

    info!("POST /api/portfolio/upload - {} ({} bytes)", filename, raw.len());

    let (kind, holdings) = ingest_service::normalize(&filename, &raw).map_err(|e| {
        error!("upload rejected: {}", e);
        e
    })?;
    let portfolio = ingest_service::commit(&state, holdings)?;

    Ok(Json(UploadResponse {
        message: format!("Portfolio uploaded successfully from {}", filename),
        file_type: kind.label(),
        total_investment: portfolio.total_value(),
        num_holdings: portfolio.len(),
        assets: portfolio.holdings.clone(),
    }))
}

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Tabular input lacks a required column. The prior portfolio is untouched.
    #[error("Missing required column: {0}")]
    MissingField(String),

    /// The statement strategy chain was exhausted with zero extracted rows.
    #[error("No holdings found in statement. Please ensure it's a valid CAS/broker statement.")]
    NoHoldingsFound,

    /// Umbrella for lower-level parse failures; carries the original message.
    #[error("Failed to parse portfolio: {0}")]
    Parse(String),

    /// The aligned return series is too short for a meaningful metric.
    #[error("Insufficient price history: {0}")]
    InsufficientHistory(String),

    #[error("No portfolio uploaded")]
    NotFound,

    #[error("Rate limited by external provider")]
    RateLimited,

    #[error("External error: {0}")]
    External(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::MissingField(_) | AppError::Parse(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::NoHoldingsFound | AppError::InsufficientHistory(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            }
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        AppError::Parse(value.to_string())
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

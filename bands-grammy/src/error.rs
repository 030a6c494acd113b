//! Error types for bands-grammy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bands_common::ErrorDesc;
use thiserror::Error;
use tracing::error;

use crate::client::ClientError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid parameter (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Catalog error, relayed with its own status
    #[error("Upstream error {status}: {}", .envelope.message)]
    Upstream { status: StatusCode, envelope: ErrorDesc },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Upstream { status, envelope } => ApiError::Upstream { status, envelope },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                ErrorDesc::new(StatusCode::BAD_REQUEST, msg).respond(StatusCode::BAD_REQUEST)
            }
            // Verbatim: path and timestamp stay the catalog's
            ApiError::Upstream { status, envelope } => envelope.into_xml_response(status),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorDesc::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error")
                    .respond(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

//! Error types for bands-catalog
//!
//! Every variant renders as the shared XML error envelope.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bands_common::{ErrorDesc, FieldError};
use thiserror::Error;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed field validation (400)
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Invalid parameter or request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Well-formed request breaking a business rule (422)
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// Database errors (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_parameter(name: &str, value: impl Display) -> Self {
        ApiError::BadRequest(format!("Invalid value for parameter {}: {}", name, value))
    }

    pub fn band_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Band with id {} does not exist", id))
    }
}

/// `number_of_participants` -> `numberOfParticipants`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            camel_case(field)
        } else {
            format!("{}.{}", prefix, camel_case(field))
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", path, e.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten("", &errors, &mut fields);
        // HashMap order is arbitrary
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        ApiError::Validation(fields)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorDesc::new(StatusCode::BAD_REQUEST, "Validation failed").with_errors(fields),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDesc::new(StatusCode::BAD_REQUEST, msg),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorDesc::new(StatusCode::NOT_FOUND, msg),
            ),
            ApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDesc::new(StatusCode::UNPROCESSABLE_ENTITY, msg),
            ),
            ApiError::Database(ref err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDesc::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error"),
                )
            }
            ApiError::Internal(ref msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDesc::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error"),
                )
            }
        };

        envelope.respond(status)
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

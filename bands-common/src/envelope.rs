//! Uniform XML error body
//!
//! Every failing request answers with an `errorDesc` document:
//!
//! ```xml
//! <errorDesc>
//!   <error>BAD_REQUEST</error>
//!   <errors><field>name</field><message>name must not be blank</message></errors>
//!   <message>Validation failed</message>
//!   <timestamp>2024-05-01T12:00:00.000Z</timestamp>
//!   <path>/bands</path>
//! </errorDesc>
//! ```
//!
//! Handlers do not know their own request path, so [`ErrorDesc::respond`]
//! stashes the envelope in the response extensions and the
//! [`stamp_error_path`] middleware fills `path` in before the body is
//! written.

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::xml::to_xml_string;

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "errorDesc")]
pub struct ErrorDesc {
    /// Status code name, e.g. `NOT_FOUND`
    pub error: String,
    /// Field-level validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub path: String,
}

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `Bad Request` -> `BAD_REQUEST`
pub fn status_code_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| reason.to_uppercase().replace([' ', '-'], "_"))
        .unwrap_or_else(|| status.as_u16().to_string())
}

impl ErrorDesc {
    /// Envelope stamped with the current time and an empty path
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: status_code_name(status),
            errors: Vec::new(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path: String::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Serialize as-is, without path stamping
    ///
    /// Used when relaying an envelope produced by another service.
    pub fn into_xml_response(self, status: StatusCode) -> Response {
        match to_xml_string(&self) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode error envelope: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    /// Serialize and mark the response for [`stamp_error_path`]
    pub fn respond(self, status: StatusCode) -> Response {
        let mut response = self.clone().into_xml_response(status);
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware filling `path` of locally produced envelopes
pub async fn stamp_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    match response.extensions_mut().remove::<ErrorDesc>() {
        Some(mut envelope) => {
            envelope.path = path;
            let status = response.status();
            envelope.into_xml_response(status)
        }
        None => response,
    }
}

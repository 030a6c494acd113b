//! XML request extractor and response wrapper
//!
//! `Xml<T>` plays the role axum's `Json<T>` plays for JSON: as an extractor
//! it requires an XML content type and decodes the body, as a response it
//! encodes `T` with `Content-Type: application/xml`.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::envelope::{ErrorDesc, XML_CONTENT_TYPE};
use crate::{Error, Result};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Encode a value as an XML document
///
/// The root element name comes from the type's `#[serde(rename)]`.
pub fn to_xml_string<T: Serialize>(value: &T) -> Result<String> {
    let body = quick_xml::se::to_string(value).map_err(|e| Error::Xml(e.to_string()))?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Decode an XML document (the root element name is not checked)
pub fn from_xml_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    quick_xml::de::from_str(text).map_err(|e| Error::Xml(e.to_string()))
}

/// Accepts `application/xml`, `text/xml` and `+xml` suffixed types
pub fn is_xml_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/xml" || mime == "text/xml" || mime.ends_with("+xml")
}

/// Reasons an XML body could not be extracted
#[derive(Debug)]
pub enum XmlRejection {
    /// Body present but not declared as XML
    UnsupportedMediaType,
    /// Required body is empty
    MissingBody,
    /// Body could not be read or decoded
    Malformed(String),
}

impl IntoResponse for XmlRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            XmlRejection::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Request body must be XML".to_string(),
            ),
            XmlRejection::MissingBody => (
                StatusCode::BAD_REQUEST,
                "Request body is required".to_string(),
            ),
            XmlRejection::Malformed(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed XML body: {}", msg),
            ),
        };

        ErrorDesc::new(status, message).respond(status)
    }
}

/// Read and decode an optional XML body
async fn decode_body<T, S>(req: Request, state: &S) -> std::result::Result<Option<T>, XmlRejection>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let declared_xml = is_xml_content_type(req.headers());
    let has_content_type = req.headers().contains_key(header::CONTENT_TYPE);

    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| XmlRejection::Malformed(e.body_text()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        if has_content_type && !declared_xml {
            return Err(XmlRejection::UnsupportedMediaType);
        }
        return Ok(None);
    }

    if !declared_xml {
        return Err(XmlRejection::UnsupportedMediaType);
    }

    let text = std::str::from_utf8(&bytes)
        .map_err(|e| XmlRejection::Malformed(e.to_string()))?;

    match from_xml_str(text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            debug!("Rejected XML body: {}", e);
            Err(XmlRejection::Malformed(e.to_string()))
        }
    }
}

/// XML body extractor and response
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Xml<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = XmlRejection;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        decode_body(req, state)
            .await?
            .map(Xml)
            .ok_or(XmlRejection::MissingBody)
    }
}

impl<T: Serialize> IntoResponse for Xml<T> {
    fn into_response(self) -> Response {
        match to_xml_string(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode XML response: {}", e);
                ErrorDesc::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected server error",
                )
                .respond(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// XML body extractor for endpoints where the body may be omitted
#[derive(Debug, Clone, Default)]
pub struct OptionalXml<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalXml<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = XmlRejection;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        decode_body(req, state).await.map(OptionalXml)
    }
}

//! HTTP client for the catalog's grammy endpoints
//!
//! Both calls are fire-and-check: success carries no body, failure carries
//! the catalog's XML error envelope, which is decoded so it can be relayed.

use std::time::Duration;

use axum::http::StatusCode;
use bands_common::envelope::XML_CONTENT_TYPE;
use bands_common::xml::from_xml_str;
use bands_common::ErrorDesc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use thiserror::Error;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog answered with an error envelope
    #[error("Catalog returned {status}: {}", .envelope.message)]
    Upstream { status: StatusCode, envelope: ErrorDesc },

    /// Catalog answered with something that is not an error envelope
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for `{base_url}/{id}/...` on the catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `{base}/{id}/singles/add`
    pub async fn add_single(&self, id: i64) -> Result<StatusCode, ClientError> {
        self.forward(Method::POST, &format!("{}/{}/singles/add", self.base_url, id))
            .await
    }

    /// DELETE `{base}/{id}/participants/remove`
    pub async fn remove_participant(&self, id: i64) -> Result<StatusCode, ClientError> {
        self.forward(Method::DELETE, &format!("{}/{}/participants/remove", self.base_url, id))
            .await
    }

    async fn forward(&self, method: Method, url: &str) -> Result<StatusCode, ClientError> {
        debug!(method = %method, url = %url, "Forwarding to catalog");

        let response = self
            .http_client
            .request(method, url)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(ACCEPT, XML_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        // reqwest and axum pin different `http` versions
        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        if status.is_success() {
            info!(url = %url, status = status.as_u16(), "Catalog accepted request");
            return Ok(status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let envelope: ErrorDesc = from_xml_str(&body).map_err(|e| {
            warn!(url = %url, status = status.as_u16(), "Undecodable catalog error body: {}", e);
            ClientError::Parse(e.to_string())
        })?;

        Err(ClientError::Upstream { status, envelope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = CatalogClient::new("http://127.0.0.1:8080/grammy/band/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/grammy/band");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_network_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let client = CatalogClient::new("http://127.0.0.1:9/grammy/band").unwrap();
        let result = client.add_single(1).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}

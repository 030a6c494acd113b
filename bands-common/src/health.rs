//! Health check body served by every bands service

use axum::Json;
use serde::Serialize;

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

impl HealthResponse {
    /// Healthy response for `module` at `version`
    pub fn ok(module: &str, version: &str) -> Json<Self> {
        Json(Self {
            status: "ok".to_string(),
            module: module.to_string(),
            version: version.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response() {
        let Json(body) = HealthResponse::ok("bands-test", "1.2.3");
        assert_eq!(body.status, "ok");
        assert_eq!(body.module, "bands-test");
        assert_eq!(body.version, "1.2.3");
    }
}

//! Service identity and health payloads.

use serde::{Deserialize, Serialize};

/// Name the service reports about itself
pub const SERVICE_NAME: &str = "wort-wirbel-api";

/// Crate version, reported by `GET /`
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Payload of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub service: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            message: "Hello World".to_string(),
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
        }
    }
}

/// Payload of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}

//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinator::Outcome;

/// Status response with the coordinator's current phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: String,
    pub outcome: Option<Outcome>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub cleanup_timeout_seconds: u64,
    pub signals: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

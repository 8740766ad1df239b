//! Health reporting.
//!
//! A static descriptive payload: no side effects, no failure modes, and no
//! dependency on upstream availability.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Payload for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,

    /// The configured upstream origin.
    pub target: String,

    /// Path of the image fetch endpoint, omitted when disabled.
    #[serde(rename = "imageProxy", skip_serializing_if = "Option::is_none")]
    pub image_proxy: Option<String>,

    /// Unix seconds at the time of the report.
    pub time: u64,
}

/// Build the current health payload.
pub fn status_payload(target: &str, image_proxy: Option<String>) -> HealthStatus {
    HealthStatus {
        status: "ok",
        target: target.to_string(),
        image_proxy,
        time: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_image_proxy() {
        let payload = status_payload("http://localhost:5120", Some("/api/proxy".into()));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["target"], "http://localhost:5120");
        assert_eq!(json["imageProxy"], "/api/proxy");
        assert!(json["time"].as_u64().unwrap() > 0);
    }

    #[test]
    fn omits_image_proxy_when_disabled() {
        let payload = status_payload("http://localhost:5120", None);
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("imageProxy").is_none());
    }
}

//! Health check.

use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "AquaLux Spa API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_body() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "AquaLux Spa API is running");
        assert!(body["timestamp"].as_str().is_some());
    }
}

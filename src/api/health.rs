//! Health check endpoint

use axum::Json;
use serde_json::{Value, json};

/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

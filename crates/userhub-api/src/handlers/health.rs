use axum::Json;
use chrono::Utc;

use crate::dto::HealthResponse;

/// Liveness probe; touches nothing.
pub async fn health_check() -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now.timestamp_micros() as f64 / 1_000_000.0,
    })
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::job::JobHandler;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(job_handler): State<Arc<JobHandler>>) -> impl IntoResponse {
    let storage = if job_handler.storage_configured() {
        "configured"
    } else {
        "inline_only"
    };

    match job_handler.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "model": "loaded",
                "storage": storage
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "model": "unavailable",
                    "storage": storage
                })),
            )
        }
    }
}

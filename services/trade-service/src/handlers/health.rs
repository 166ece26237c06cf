use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, storage) = match state.trade_service.check_storage_health().await {
        Ok(()) => ("healthy", "healthy".to_string()),
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            ("degraded", format!("unhealthy: {}", e))
        }
    };
    let metrics = state.trade_service.metrics();

    Json(json!({
        "service": "trade-service",
        "status": status,
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "trades": {
            "created": metrics.created_count(),
            "rejected": {
                "malformed": metrics.rejection_count("malformed"),
                "validation": metrics.rejection_count("validation"),
                "storage": metrics.rejection_count("storage"),
            }
        }
    }))
}

/// Prometheus 指标
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.gather() {
        Ok(metrics) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to gather metrics").into_response()
        }
    }
}

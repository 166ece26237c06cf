use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

use super::request_id::RequestId;
use crate::state::AppState;

/// 指标中间件：记录请求计数、耗时和访问日志
pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    // 使用路由模板作为标签，避免ID导致标签基数膨胀
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    state
        .metrics
        .record_http_request(&method, &path, status_code, duration);

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status_code,
        duration_ms = duration.as_millis() as u64,
        "HTTP request completed"
    );

    response
}

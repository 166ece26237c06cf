use axum::{middleware, Router};
use std::{future::Future, io, sync::Arc, time::Duration};
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::warn;

use crate::{
    handlers::create_routes,
    middleware::{metrics::metrics_middleware, request_id::request_id_middleware},
    state::AppState,
};

/// 组装路由和中间件
pub fn build_app(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout);
    with_layers(create_routes(), state, request_timeout)
}

fn with_layers(routes: Router<AppState>, state: AppState, request_timeout: Duration) -> Router {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        // 超时返回 408
        .layer(TimeoutLayer::new(request_timeout));

    routes
        // route_layer 在路由匹配之后执行，可以拿到 MatchedPath
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(layers)
        .with_state(state)
}

/// 运行服务直到结束。
///
/// `shutdown` 被通知后，剩余连接最多再处理 `drain_timeout`，超时直接返回。
pub async fn serve_with_drain_timeout<F>(
    server: F,
    shutdown: Arc<Notify>,
    drain_timeout: Duration,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result,
        _ = shutdown.notified() => {
            match tokio::time::timeout(drain_timeout, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        timeout_secs = drain_timeout.as_secs_f64(),
                        "Graceful shutdown timed out, dropping remaining connections"
                    );
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TradeServiceConfig, storage::MemoryTradeStore};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use shared_utils::AppMetrics;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        AppState::with_store(
            TradeServiceConfig::default(),
            metrics,
            Arc::new(MemoryTradeStore::new()),
        )
        .unwrap()
    }

    fn test_app() -> Router {
        build_app(test_state())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_storage() {
        let app = test_app();

        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);

        let health: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["service"], "trade-service");
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["storage"], "healthy");
        assert_eq!(health["trades"]["created"], 0);
    }

    #[tokio::test]
    async fn test_metrics_exposed() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/trades")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "type": "buy",
                    "user_id": 1,
                    "symbol": "USD",
                    "shares": 12,
                    "price": 90,
                    "timestamp": 1531522701000i64
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let (status, body) = get(&app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("trades_created_total 1"));
        assert!(body.contains("http_requests_total"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app();
        let (status, body) = get(&app, "/orders").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_method_on_collection() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/trades")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = test_app();
        let request = Request::builder().uri("/trades").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_408() {
        let routes = create_routes().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_layers(routes, test_state(), Duration::from_millis(20));

        let (status, _) = get(&app, "/slow").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

        // 正常请求不受影响
        let (status, _) = get(&app, "/trades").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_drain_stops_after_timeout() {
        let shutdown = Arc::new(Notify::new());
        shutdown.notify_one();

        let started = std::time::Instant::now();
        let result = serve_with_drain_timeout(
            std::future::pending::<io::Result<()>>(),
            shutdown,
            Duration::from_millis(20),
        )
        .await;

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_server_result_returned_when_drained_in_time() {
        let shutdown = Arc::new(Notify::new());

        let result = serve_with_drain_timeout(
            async { Err(io::Error::new(io::ErrorKind::Other, "bind lost")) },
            shutdown,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "bind lost");
    }
}

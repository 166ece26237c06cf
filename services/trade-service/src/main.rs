mod app;
mod config;
mod handlers;
mod metrics;
mod middleware;
mod models;
mod services;
mod state;
mod storage;

use anyhow::Result;
use shared_utils::{AppMetrics, LoggingInitializer};
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Notify};
use tracing::info;

use crate::{
    app::{build_app, serve_with_drain_timeout},
    config::TradeServiceConfig,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = TradeServiceConfig::load()?;

    // 初始化日志
    LoggingInitializer::init(&config.logging.level, config.logging.format)?;

    config.validate()?;
    info!(backend = ?config.storage.backend, "Trade service configuration loaded");

    // 初始化指标
    let metrics = Arc::new(AppMetrics::new()?);

    // 创建应用状态
    let state = AppState::new(config.clone(), metrics).await?;
    info!("Application state initialized");

    let app = build_app(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Trade service listening on {}", addr);
    info!("Trades API available at http://{}/trades", addr);
    info!("Health check available at http://{}/health", addr);

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.notify_one();
        }
    });

    serve_with_drain_timeout(
        server.into_future(),
        shutdown,
        Duration::from_secs(config.server.shutdown_timeout),
    )
    .await?;

    info!("Trade service stopped");
    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

use anyhow::{Context, Result};
use shared_utils::AppMetrics;
use std::sync::Arc;
use tracing::info;

use crate::{
    config::{StorageBackend, TradeServiceConfig},
    metrics::TradeMetrics,
    services::TradeService,
    storage::{MemoryTradeStore, PgTradeStore, TradeRepository},
};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub config: TradeServiceConfig,
    pub metrics: Arc<AppMetrics>,

    // 服务层
    pub trade_service: Arc<TradeService>,
}

impl AppState {
    pub async fn new(config: TradeServiceConfig, metrics: Arc<AppMetrics>) -> Result<Self> {
        // 创建存储层
        let trade_store: Arc<dyn TradeRepository> = match config.storage.backend {
            StorageBackend::Postgres => {
                let store = PgTradeStore::connect(&config.database)
                    .await
                    .context("Failed to connect to database")?;
                if config.database.run_migrations {
                    store.migrate().await.context("Failed to run migrations")?;
                }
                Arc::new(store)
            }
            StorageBackend::Memory => {
                info!("Using in-memory trade store");
                Arc::new(MemoryTradeStore::new())
            }
        };

        Self::with_store(config, metrics, trade_store)
    }

    /// 使用指定的存储后端构建状态
    pub fn with_store(
        config: TradeServiceConfig,
        metrics: Arc<AppMetrics>,
        trade_store: Arc<dyn TradeRepository>,
    ) -> Result<Self> {
        let trade_metrics = TradeMetrics::new(&metrics)?;
        let trade_service = Arc::new(TradeService::new(trade_store, trade_metrics));

        Ok(Self {
            config,
            metrics,
            trade_service,
        })
    }
}

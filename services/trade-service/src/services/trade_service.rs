use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    metrics::TradeMetrics,
    models::{NewTrade, StoreResult, Trade, TradeId, TradeResult},
    storage::TradeRepository,
};

/// 交易记录服务
#[derive(Clone)]
pub struct TradeService {
    trade_store: Arc<dyn TradeRepository>,
    metrics: TradeMetrics,
}

impl TradeService {
    pub fn new(trade_store: Arc<dyn TradeRepository>, metrics: TradeMetrics) -> Self {
        Self {
            trade_store,
            metrics,
        }
    }

    /// 创建交易记录
    pub async fn create_trade(&self, payload: &Map<String, Value>) -> TradeResult<Trade> {
        // 1. 校验请求
        let new_trade = NewTrade::from_payload(payload).map_err(|e| {
            debug!("Trade rejected: {}", e);
            self.metrics.record_rejection("validation");
            e
        })?;

        // 2. 写入存储，失败不重试
        let trade = self.trade_store.insert(&new_trade).await.map_err(|e| {
            error!("Failed to persist trade: {}", e);
            self.metrics.record_rejection("storage");
            e
        })?;

        self.metrics.record_created();
        info!(
            trade_id = trade.id,
            user_id = trade.user_id,
            symbol = %trade.symbol,
            "Trade created"
        );

        Ok(trade)
    }

    /// 查询单笔交易
    pub async fn get_trade(&self, id: TradeId) -> TradeResult<Option<Trade>> {
        Ok(self.trade_store.get_by_id(id).await?)
    }

    /// 查询全部交易，按ID升序
    pub async fn list_trades(&self) -> TradeResult<Vec<Trade>> {
        Ok(self.trade_store.list_all().await?)
    }

    /// 记录格式错误的请求
    pub fn record_malformed(&self) {
        self.metrics.record_rejection("malformed");
    }

    pub fn metrics(&self) -> &TradeMetrics {
        &self.metrics
    }

    /// 检查存储健康状态
    pub async fn check_storage_health(&self) -> StoreResult<()> {
        self.trade_store.health_check().await
    }
}

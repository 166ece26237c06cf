use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;
use tracing::{info, warn};

use super::TradeRepository;
use crate::{
    config::DatabaseConfig,
    models::{NewTrade, StoreResult, Trade, TradeId},
};

const INSERT_TRADE: &str = r#"
    INSERT INTO trades (type, user_id, symbol, shares, price, "timestamp")
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, type, user_id, symbol, shares, price, "timestamp"
"#;

const SELECT_TRADE: &str = r#"
    SELECT id, type, user_id, symbol, shares, price, "timestamp"
    FROM trades WHERE id = $1
"#;

const SELECT_ALL_TRADES: &str = r#"
    SELECT id, type, user_id, symbol, shares, price, "timestamp"
    FROM trades ORDER BY id ASC
"#;

/// 基于 PostgreSQL 的交易记录存储
///
/// 每个操作从连接池借出连接，操作结束即归还。
#[derive(Clone)]
pub struct PgTradeStore {
    pool: PgPool,
}

impl PgTradeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按配置创建连接池
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout)))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Database connection pool created"
        );
        Ok(Self::new(pool))
    }

    /// 执行内置迁移
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// 将数据库行转换为交易记录
    fn row_to_trade(row: &PgRow) -> StoreResult<Trade> {
        Ok(Trade {
            id: row.try_get("id")?,
            trade_type: row.try_get("type")?,
            user_id: row.try_get("user_id")?,
            symbol: row.try_get("symbol")?,
            shares: row.try_get("shares")?,
            price: row.try_get("price")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}

#[async_trait]
impl TradeRepository for PgTradeStore {
    async fn insert(&self, trade: &NewTrade) -> StoreResult<Trade> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(INSERT_TRADE)
            .bind(&trade.trade_type)
            .bind(trade.user_id)
            .bind(&trade.symbol)
            .bind(trade.shares)
            .bind(trade.price)
            .bind(trade.timestamp)
            .fetch_one(&mut *tx)
            .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Failed to roll back trade insert: {}", rollback_err);
                }
                return Err(e.into());
            }
        };

        // 转换失败时 tx 被丢弃，自动回滚
        let stored = Self::row_to_trade(&row)?;
        tx.commit().await?;

        Ok(stored)
    }

    async fn get_by_id(&self, id: TradeId) -> StoreResult<Option<Trade>> {
        let row = sqlx::query(SELECT_TRADE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_trade).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Trade>> {
        let rows = sqlx::query(SELECT_ALL_TRADES)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_trade).collect()
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub mod memory_store;
pub mod trade_store;

pub use memory_store::MemoryTradeStore;
pub use trade_store::PgTradeStore;

use async_trait::async_trait;

use crate::models::{NewTrade, StoreResult, Trade, TradeId};

/// 交易记录存储接口
///
/// 只支持新增和查询；记录一经写入不可修改或删除。
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// 分配下一个ID并写入，返回完整记录
    async fn insert(&self, trade: &NewTrade) -> StoreResult<Trade>;

    /// 按ID查询，不存在时返回 `None`
    async fn get_by_id(&self, id: TradeId) -> StoreResult<Option<Trade>>;

    /// 按ID升序返回全部记录
    async fn list_all(&self) -> StoreResult<Vec<Trade>>;

    /// 存储后端是否可用
    async fn health_check(&self) -> StoreResult<()>;
}

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::TradeRepository;
use crate::models::{NewTrade, StoreResult, Trade, TradeId};

#[derive(Debug)]
struct Inner {
    next_id: TradeId,
    trades: BTreeMap<TradeId, Trade>,
}

/// 进程内交易记录存储，ID从1开始递增
#[derive(Debug)]
pub struct MemoryTradeStore {
    inner: RwLock<Inner>,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                trades: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTradeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeRepository for MemoryTradeStore {
    async fn insert(&self, trade: &NewTrade) -> StoreResult<Trade> {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let stored = trade.clone().with_id(id);
        inner.trades.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: TradeId) -> StoreResult<Option<Trade>> {
        Ok(self.inner.read().trades.get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Trade>> {
        Ok(self.inner.read().trades.values().cloned().collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

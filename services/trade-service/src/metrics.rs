use anyhow::Result;
use prometheus::{IntCounter, IntCounterVec, Opts};
use shared_utils::AppMetrics;

/// 交易业务指标
#[derive(Clone)]
pub struct TradeMetrics {
    trades_created: IntCounter,
    trade_rejections: IntCounterVec,
}

impl TradeMetrics {
    /// 创建并注册到应用指标注册表
    pub fn new(metrics: &AppMetrics) -> Result<Self> {
        let trades_created = IntCounter::new("trades_created_total", "Total number of trades created")?;
        metrics.register(&trades_created)?;

        let trade_rejections = IntCounterVec::new(
            Opts::new("trade_rejections_total", "Total number of rejected trade creations"),
            &["reason"],
        )?;
        metrics.register(&trade_rejections)?;

        Ok(Self {
            trades_created,
            trade_rejections,
        })
    }

    pub fn record_created(&self) {
        self.trades_created.inc();
    }

    /// `reason`: malformed / validation / storage
    pub fn record_rejection(&self, reason: &str) {
        self.trade_rejections.with_label_values(&[reason]).inc();
    }

    pub fn created_count(&self) -> u64 {
        self.trades_created.get()
    }

    pub fn rejection_count(&self, reason: &str) -> u64 {
        self.trade_rejections.with_label_values(&[reason]).get()
    }
}

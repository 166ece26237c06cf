use anyhow::Result;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// 应用指标
pub struct AppMetrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration: HistogramVec,
}

impl AppMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
        })
    }

    /// 注册业务侧自定义指标
    pub fn register<C: Collector + Clone + 'static>(&self, collector: &C) -> Result<()> {
        self.registry.register(Box::new(collector.clone()))?;
        Ok(())
    }

    /// 记录HTTP请求
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        self.http_requests_total
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(duration.as_secs_f64());
    }

    /// 导出 Prometheus 文本格式
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::IntCounter;

    #[test]
    fn test_record_and_gather() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_http_request("GET", "/trades", 200, Duration::from_millis(5));

        let output = metrics.gather().unwrap();
        assert!(output.contains("http_requests_total"));
        assert!(output.contains("path=\"/trades\""));
        assert!(output.contains("http_request_duration_seconds"));
    }

    #[test]
    fn test_register_custom_collector() {
        let metrics = AppMetrics::new().unwrap();
        let counter = IntCounter::new("custom_total", "custom counter").unwrap();
        metrics.register(&counter).unwrap();
        counter.inc();

        assert!(metrics.gather().unwrap().contains("custom_total 1"));
        // 重复注册失败
        assert!(metrics.register(&counter).is_err());
    }
}

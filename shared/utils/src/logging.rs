use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// 日志初始化器
pub struct LoggingInitializer;

impl LoggingInitializer {
    /// 开发环境：可读格式，默认 debug 级别
    pub fn init_dev() -> Result<()> {
        Self::init("debug", LogFormat::Pretty)
    }

    /// 生产环境：JSON 格式，默认 info 级别
    pub fn init_prod() -> Result<()> {
        Self::init("info", LogFormat::Json)
    }

    /// 按级别和格式初始化全局订阅器。
    ///
    /// `RUST_LOG` 存在时优先于 `level`。
    pub fn init(level: &str, format: LogFormat) -> Result<()> {
        let filter = Self::build_filter(level)?;

        let result = match format {
            LogFormat::Pretty => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .try_init(),
            LogFormat::Json => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_current_span(true)
                .try_init(),
        };

        result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
    }

    fn build_filter(level: &str) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(level)
                .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e)),
        }
    }
}

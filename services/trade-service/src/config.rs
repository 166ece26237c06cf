use anyhow::Result;
use serde::{Deserialize, Serialize};
use shared_utils::{ConfigLoader, LogFormat};

/// 交易记录服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TradeServiceConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单个请求超时（秒）
    pub request_timeout: u64,
    /// 收到停止信号后等待连接结束的时间（秒）
    pub shutdown_timeout: u64,
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// 数据库配置，时间单位均为秒
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub run_migrations: bool,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl TradeServiceConfig {
    /// 加载配置：`config/trade-service.*` 文件，再由 `TRADE_SERVICE__*` 环境变量覆盖
    pub fn load() -> Result<Self> {
        Self::loader("config/trade-service", "TRADE_SERVICE")?.load()
    }

    fn loader(file: &str, env_prefix: &str) -> Result<ConfigLoader> {
        ConfigLoader::new(file, env_prefix)
            .with_default("server.host", "0.0.0.0")?
            .with_default("server.port", 8080)?
            .with_default("server.request_timeout", 30)?
            .with_default("server.shutdown_timeout", 10)?
            .with_default("storage.backend", "postgres")?
            .with_default("database.url", "postgresql://localhost:5432/trades")?
            .with_default("database.max_connections", 20)?
            .with_default("database.min_connections", 1)?
            .with_default("database.connect_timeout", 10)?
            .with_default("database.idle_timeout", 300)?
            .with_default("database.run_migrations", true)?
            .with_default("logging.level", "info")?
            .with_default("logging.format", "pretty")
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.server.request_timeout == 0 {
            return Err(anyhow::anyhow!("Request timeout cannot be 0"));
        }

        if self.server.shutdown_timeout == 0 {
            return Err(anyhow::anyhow!("Shutdown timeout cannot be 0"));
        }

        if self.storage.backend == StorageBackend::Postgres {
            if self.database.url.is_empty() {
                return Err(anyhow::anyhow!("Database URL is required"));
            }

            if self.database.max_connections == 0 {
                return Err(anyhow::anyhow!("Database max connections cannot be 0"));
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(anyhow::anyhow!(
                    "Database min connections ({}) exceeds max connections ({})",
                    self.database.min_connections,
                    self.database.max_connections
                ));
            }
        }

        Ok(())
    }
}

impl Default for TradeServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout: 30,
                shutdown_timeout: 10,
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost:5432/trades".to_string(),
                max_connections: 20,
                min_connections: 1,
                connect_timeout: 10,
                idle_timeout: 300,
                run_migrations: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        let config: TradeServiceConfig = TradeServiceConfig::loader("config/missing", "TRADE_SERVICE_TEST_DEFAULTS")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout, 30);
        assert_eq!(config.server.shutdown_timeout, 10);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 20);
        assert!(config.database.run_migrations);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_override() {
        let config: TradeServiceConfig = TradeServiceConfig::loader("config/missing", "TRADE_SERVICE_TEST_MEMORY")
            .unwrap()
            .with_override("storage.backend", "memory")
            .unwrap()
            .with_override("database.url", "")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        // 内存后端不需要数据库地址
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TradeServiceConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = TradeServiceConfig::default();
        config.server.shutdown_timeout = 0;
        assert!(config.validate().is_err());

        let mut config = TradeServiceConfig::default();
        config.database.url.clear();
        assert!(config.validate().is_err());

        let mut config = TradeServiceConfig::default();
        config.database.min_connections = 50;
        assert!(config.validate().is_err());
    }
}

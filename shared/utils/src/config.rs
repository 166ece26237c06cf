use anyhow::{Context, Result};
use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, Value};
use serde::de::DeserializeOwned;

/// 分层配置加载器：默认值 < 配置文件 < 环境变量
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// `file` 为不带扩展名的配置文件路径（可选存在），
    /// `env_prefix` 为环境变量前缀，层级以 `__` 分隔。
    pub fn new(file: &str, env_prefix: &str) -> Self {
        let builder = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self { builder }
    }

    /// 设置默认值
    pub fn with_default<V: Into<Value>>(mut self, key: &str, value: V) -> Result<Self> {
        self.builder = self
            .builder
            .set_default(key, value)
            .with_context(|| format!("Invalid default for '{}'", key))?;
        Ok(self)
    }

    /// 强制覆盖某个键
    pub fn with_override<V: Into<Value>>(mut self, key: &str, value: V) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("Invalid override for '{}'", key))?;
        Ok(self)
    }

    pub fn load<T: DeserializeOwned>(self) -> Result<T> {
        let settings = self.builder.build().context("Failed to build configuration")?;
        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        server: SampleServer,
    }

    #[derive(Debug, Deserialize)]
    struct SampleServer {
        host: String,
        port: u16,
    }

    #[test]
    fn test_defaults_and_overrides() {
        let sample: Sample = ConfigLoader::new("config/does-not-exist", "SHARED_UTILS_TEST")
            .with_default("server.host", "127.0.0.1")
            .unwrap()
            .with_default("server.port", 8080)
            .unwrap()
            .with_override("server.port", 9090)
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(sample.server.host, "127.0.0.1");
        assert_eq!(sample.server.port, 9090);
    }

    #[test]
    fn test_missing_key_fails() {
        let result: Result<Sample> =
            ConfigLoader::new("config/does-not-exist", "SHARED_UTILS_TEST").load();
        assert!(result.is_err());
    }
}

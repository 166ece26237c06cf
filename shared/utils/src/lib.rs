pub mod config;
pub mod logging;
pub mod metrics;

pub use self::config::ConfigLoader;
pub use logging::{LogFormat, LoggingInitializer};
pub use metrics::AppMetrics;

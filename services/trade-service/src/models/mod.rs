pub mod trade;

pub use trade::*;

use thiserror::Error;

/// 交易记录ID类型
pub type TradeId = i64;

/// 创建请求校验错误。每次只报告第一个违规字段。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be an integer")]
    NotInteger(&'static str),

    #[error("{0} must be a string")]
    NotString(&'static str),

    #[error("shares must be between {min} and {max} inclusive")]
    SharesOutOfRange { min: i64, max: i64 },
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 交易业务错误
#[derive(Debug, Error)]
pub enum TradeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type TradeResult<T> = Result<T, TradeError>;

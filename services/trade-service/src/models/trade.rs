use super::{TradeId, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单笔交易允许的最小股数
pub const MIN_SHARES: i64 = 10;

/// 单笔交易允许的最大股数
pub const MAX_SHARES: i64 = 30;

/// 已持久化的交易记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    #[serde(rename = "type")]
    pub trade_type: String,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    /// 整数价格，不做小数或货币单位换算
    pub price: i64,
    /// 毫秒时间戳
    pub timestamp: i64,
}

/// 通过校验、尚未分配ID的交易
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrade {
    pub trade_type: String,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub price: i64,
    pub timestamp: i64,
}

impl NewTrade {
    /// 从请求体解析并校验。
    ///
    /// 依次执行：必填检查、类型检查、股数范围检查；返回遇到的第一个错误。
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationError> {
        let field = move |name: &'static str| {
            payload.get(name).ok_or(ValidationError::MissingField(name))
        };

        // 结构体字段按书写顺序求值，即必填检查顺序
        let fields = RequiredFields {
            trade_type: field("type")?,
            user_id: field("user_id")?,
            symbol: field("symbol")?,
            shares: field("shares")?,
            price: field("price")?,
            timestamp: field("timestamp")?,
        };

        // 类型检查顺序：user_id, shares, price, type, symbol, timestamp
        let user_id = as_integer(fields.user_id, "user_id")?;
        let shares = as_integer(fields.shares, "shares")?;
        let price = as_integer(fields.price, "price")?;
        let trade_type = as_string(fields.trade_type, "type")?;
        let symbol = as_string(fields.symbol, "symbol")?;
        let timestamp = as_integer(fields.timestamp, "timestamp")?;

        if !(MIN_SHARES..=MAX_SHARES).contains(&shares) {
            return Err(ValidationError::SharesOutOfRange {
                min: MIN_SHARES,
                max: MAX_SHARES,
            });
        }

        Ok(Self {
            trade_type,
            user_id,
            symbol,
            shares,
            price,
            timestamp,
        })
    }

    /// 分配ID后转为交易记录
    pub fn with_id(self, id: TradeId) -> Trade {
        Trade {
            id,
            trade_type: self.trade_type,
            user_id: self.user_id,
            symbol: self.symbol,
            shares: self.shares,
            price: self.price,
            timestamp: self.timestamp,
        }
    }
}

/// 已确认存在、尚未做类型检查的必填字段
struct RequiredFields<'a> {
    trade_type: &'a Value,
    user_id: &'a Value,
    symbol: &'a Value,
    shares: &'a Value,
    price: &'a Value,
    timestamp: &'a Value,
}

fn as_integer(value: &Value, field: &'static str) -> Result<i64, ValidationError> {
    value.as_i64().ok_or(ValidationError::NotInteger(field))
}

fn as_string(value: &Value, field: &'static str) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::NotString(field))
}

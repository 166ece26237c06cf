use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use super::error::ApiError;
use crate::{
    models::{Trade, TradeId},
    state::AppState,
};

/// 解析路径中的交易ID：仅接受非负十进制整数。
/// 路径段无法解码（例如非 UTF-8）时同样视为不存在。
fn trade_id_from_path(path: Result<Path<String>, PathRejection>) -> Option<TradeId> {
    let Path(raw) = path.ok()?;
    parse_trade_id(&raw)
}

fn parse_trade_id(raw: &str) -> Option<TradeId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// 创建交易
pub async fn create_trade(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Trade>), ApiError> {
    let payload = match payload {
        Ok(Json(Value::Object(map))) => map,
        Ok(Json(_)) => {
            state.trade_service.record_malformed();
            return Err(ApiError::Malformed(
                "request body must be a JSON object".to_string(),
            ));
        }
        Err(rejection) => {
            state.trade_service.record_malformed();
            return Err(rejection.into());
        }
    };

    let trade = state.trade_service.create_trade(&payload).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// 查询交易列表
pub async fn list_trades(State(state): State<AppState>) -> Result<Json<Vec<Trade>>, ApiError> {
    let trades = state.trade_service.list_trades().await?;
    Ok(Json(trades))
}

/// 查询单笔交易
pub async fn get_trade(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Trade>, ApiError> {
    let trade_id = trade_id_from_path(path).ok_or(ApiError::NotFound)?;

    match state.trade_service.get_trade(trade_id).await? {
        Some(trade) => Ok(Json(trade)),
        None => Err(ApiError::NotFound),
    }
}

/// 交易记录不可修改或删除：PUT / PATCH / DELETE 一律 405，不访问存储
pub async fn reject_mutation(path: Result<Path<String>, PathRejection>) -> ApiError {
    match trade_id_from_path(path) {
        Some(_) => ApiError::MethodNotAllowed,
        None => ApiError::NotFound,
    }
}

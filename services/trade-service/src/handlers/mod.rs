use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod error;
pub mod health;
pub mod trades;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // 健康检查
        .route("/health", get(health::health_check))
        // 交易记录
        .route("/trades", post(trades::create_trade).get(trades::list_trades))
        .route(
            "/trades/:id",
            get(trades::get_trade)
                .put(trades::reject_mutation)
                .patch(trades::reject_mutation)
                .delete(trades::reject_mutation),
        )
        // 指标
        .route("/metrics", get(health::metrics))
}

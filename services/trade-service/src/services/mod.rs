pub mod trade_service;

pub use trade_service::TradeService;

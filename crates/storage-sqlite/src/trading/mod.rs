//! SQLite storage implementation for trading results.

mod model;
mod repository;

pub use model::{NewTradingResultDB, TradingResultDB};
pub use repository::TradingRepository;

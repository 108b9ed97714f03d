use crate::errors::Result;
use crate::trading::trading_model::{
    DateRangeFilter, NewTradingResult, TradingFilter, TradingResult,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for trading results repository operations
#[async_trait]
pub trait TradingRepositoryTrait: Send + Sync {
    /// Distinct trading days, newest first, at most `limit`.
    fn last_trading_dates(&self, limit: i64) -> Result<Vec<NaiveDate>>;
    /// Rows inside the filter's inclusive date range, oldest first.
    fn dynamics(&self, filter: &DateRangeFilter) -> Result<Vec<TradingResult>>;
    /// Rows matching the filter, newest first, at most `limit`.
    fn latest_results(&self, filter: &TradingFilter, limit: i64) -> Result<Vec<TradingResult>>;
    async fn insert_results(&self, results: Vec<NewTradingResult>) -> Result<usize>;
}

/// Trait for trading results service operations
#[async_trait]
pub trait TradingServiceTrait: Send + Sync {
    fn get_last_trading_dates(&self, limit: i64) -> Result<Vec<NaiveDate>>;
    fn get_dynamics(&self, filter: &DateRangeFilter) -> Result<Vec<TradingResult>>;
    fn get_trading_results(&self, filter: &TradingFilter, limit: i64)
        -> Result<Vec<TradingResult>>;
    async fn import_results(&self, results: Vec<NewTradingResult>) -> Result<usize>;
}

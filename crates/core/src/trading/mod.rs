//! Trading results module - domain models, filter validation, services, and traits.

mod trading_model;
mod trading_service;
mod trading_traits;
pub mod validation;

pub use trading_model::{
    DateRangeFilter, DateRangeQuery, NewTradingResult, TradingFilter, TradingFilterQuery,
    TradingResult,
};
pub use trading_service::TradingService;
pub use trading_traits::{TradingRepositoryTrait, TradingServiceTrait};
pub use validation::{validate_date_range, validate_filter, validate_limit};

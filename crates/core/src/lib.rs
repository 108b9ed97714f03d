//! Spimex Core - domain entities, filter validation, response caching, and traits.
//!
//! This crate contains the business logic of the trading results API.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod cache;
pub mod constants;
pub mod errors;
pub mod trading;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Core error types for the trading results API.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the trading results API.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Cache operation failed: {0}")]
    Cache(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Classification of a validation failure, rendered as the `type` of an
/// HTTP 422 error descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Missing,
    StringPatternMismatch,
    DateParsing,
    LessThanEqual,
    IntParsing,
    GreaterThanEqual,
    ValueError,
    QueryParsing,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::Missing => "missing",
            ValidationKind::StringPatternMismatch => "string_pattern_mismatch",
            ValidationKind::DateParsing => "date_parsing",
            ValidationKind::LessThanEqual => "less_than_equal",
            ValidationKind::IntParsing => "int_parsing",
            ValidationKind::GreaterThanEqual => "greater_than_equal",
            ValidationKind::ValueError => "value_error",
            ValidationKind::QueryParsing => "query_parsing",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request filter.
///
/// `loc` names the offending field(s), `msg` is the human readable reason and
/// `kind` is the machine readable category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {msg}", loc.join("."))]
pub struct ValidationError {
    pub loc: Vec<String>,
    pub msg: String,
    pub kind: ValidationKind,
}

impl ValidationError {
    /// Location prefix for fields parsed from the HTTP query string.
    pub const QUERY: &'static str = "query";

    fn query_field(field: &str, msg: String, kind: ValidationKind) -> Self {
        Self {
            loc: vec![Self::QUERY.to_string(), field.to_string()],
            msg,
            kind,
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::query_field(field, "Field required".to_string(), ValidationKind::Missing)
    }

    pub fn pattern_mismatch(field: &str, pattern: &str) -> Self {
        Self::query_field(
            field,
            format!("String should match pattern '{}'", pattern),
            ValidationKind::StringPatternMismatch,
        )
    }

    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::query_field(
            field,
            format!("Input should be a valid date in the format YYYY-MM-DD, got '{}'", value),
            ValidationKind::DateParsing,
        )
    }

    pub fn date_after(field: &str, limit: chrono::NaiveDate) -> Self {
        Self::query_field(
            field,
            format!("Input should be less than or equal to {}", limit.format("%Y-%m-%d")),
            ValidationKind::LessThanEqual,
        )
    }

    pub fn invalid_integer(field: &str) -> Self {
        Self::query_field(
            field,
            "Input should be a valid integer, unable to parse string as an integer".to_string(),
            ValidationKind::IntParsing,
        )
    }

    pub fn below_minimum(field: &str, minimum: i64) -> Self {
        Self::query_field(
            field,
            format!("Input should be greater than or equal to {}", minimum),
            ValidationKind::GreaterThanEqual,
        )
    }

    /// Cross-field failure: the range start lies after the range end.
    pub fn inverted_range(start_field: &str, end_field: &str) -> Self {
        Self {
            loc: vec![start_field.to_string(), end_field.to_string()],
            msg: "Range start date must not be later than range end date".to_string(),
            kind: ValidationKind::ValueError,
        }
    }

    /// The query string as a whole could not be parsed.
    pub fn malformed_query(reason: &str) -> Self {
        Self {
            loc: vec![Self::QUERY.to_string()],
            msg: reason.to_string(),
            kind: ValidationKind::QueryParsing,
        }
    }

    /// The last element of `loc`, which is the field name for single-field errors.
    pub fn field(&self) -> Option<&str> {
        self.loc.last().map(String::as_str)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::pattern_mismatch("oil_id", r"^[A-Z0-9\-]{4}$");
        assert_eq!(
            err.to_string(),
            r"query.oil_id: String should match pattern '^[A-Z0-9\-]{4}$'"
        );
        assert_eq!(err.field(), Some("oil_id"));

        let err = ValidationError::inverted_range("start_date", "end_date");
        assert_eq!(err.loc, vec!["start_date", "end_date"]);
        assert_eq!(err.kind.as_str(), "value_error");
    }

    #[test]
    fn test_date_after_message() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 23).unwrap();
        let err = ValidationError::date_after("end_date", today);
        assert_eq!(err.msg, "Input should be less than or equal to 2025-03-23");
        assert_eq!(err.kind, ValidationKind::LessThanEqual);
    }

    #[test]
    fn test_malformed_query_points_at_the_query() {
        let err = ValidationError::malformed_query("duplicate field `limit`");
        assert_eq!(err.loc, vec!["query"]);
        assert_eq!(err.kind.as_str(), "query_parsing");
        assert_eq!(err.to_string(), "query: duplicate field `limit`");
    }

    #[test]
    fn test_validation_converts_into_core_error() {
        let err: Error = ValidationError::missing("start_date").into();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Input validation failed: query.start_date: Field required"
        );
    }
}

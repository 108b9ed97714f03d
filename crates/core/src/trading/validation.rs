//! Validation of raw query-string filters.
//!
//! Every check runs before the request touches the cache or the database.
//! Identifier fields are checked first, then each date on its own, then the
//! ordering of the range. The first failure is returned.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    DATE_FORMAT, DEFAULT_LIMIT, DELIVERY_BASIS_ID_PATTERN, DELIVERY_TYPE_ID_PATTERN,
    OIL_ID_PATTERN,
};
use crate::errors::ValidationError;

use super::trading_model::{DateRangeFilter, DateRangeQuery, TradingFilter, TradingFilterQuery};

static OIL_ID_RE: Lazy<Regex> = Lazy::new(|| compile(OIL_ID_PATTERN));
static DELIVERY_TYPE_ID_RE: Lazy<Regex> = Lazy::new(|| compile(DELIVERY_TYPE_ID_PATTERN));
static DELIVERY_BASIS_ID_RE: Lazy<Regex> = Lazy::new(|| compile(DELIVERY_BASIS_ID_PATTERN));

// Patterns are constants covered by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("identifier pattern must be a valid regex")
}

/// Blank values are what an untouched HTML form field submits; treat them as absent.
fn non_blank(raw: Option<&String>) -> Option<&str> {
    raw.map(String::as_str).filter(|s| !s.is_empty())
}

fn check_pattern(
    field: &str,
    raw: Option<&String>,
    re: &Regex,
    pattern: &str,
) -> Result<Option<String>, ValidationError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) if re.is_match(value) => Ok(Some(value.to_string())),
        Some(_) => Err(ValidationError::pattern_mismatch(field, pattern)),
    }
}

/// Validates the optional product/delivery identifiers.
pub fn validate_filter(query: &TradingFilterQuery) -> Result<TradingFilter, ValidationError> {
    Ok(TradingFilter {
        oil_id: check_pattern("oil_id", query.oil_id.as_ref(), &OIL_ID_RE, OIL_ID_PATTERN)?,
        delivery_type_id: check_pattern(
            "delivery_type_id",
            query.delivery_type_id.as_ref(),
            &DELIVERY_TYPE_ID_RE,
            DELIVERY_TYPE_ID_PATTERN,
        )?,
        delivery_basis_id: check_pattern(
            "delivery_basis_id",
            query.delivery_basis_id.as_ref(),
            &DELIVERY_BASIS_ID_RE,
            DELIVERY_BASIS_ID_PATTERN,
        )?,
    })
}

fn check_date(
    field: &str,
    raw: Option<&String>,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    let value = non_blank(raw).ok_or_else(|| ValidationError::missing(field))?;
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_date(field, value))?;
    if date > today {
        return Err(ValidationError::date_after(field, today));
    }
    Ok(date)
}

/// Validates a date-range filter against `today`.
///
/// Both dates are required and must not lie in the future. A range whose
/// start is after its end is rejected even when both dates are individually
/// valid.
pub fn validate_date_range(
    query: &DateRangeQuery,
    today: NaiveDate,
) -> Result<DateRangeFilter, ValidationError> {
    let filter = validate_filter(&query.filter)?;
    let start_date = check_date("start_date", query.start_date.as_ref(), today)?;
    let end_date = check_date("end_date", query.end_date.as_ref(), today)?;

    if start_date > end_date {
        return Err(ValidationError::inverted_range("start_date", "end_date"));
    }

    Ok(DateRangeFilter {
        filter,
        start_date,
        end_date,
    })
}

/// Parses the optional `limit` parameter, falling back to [`DEFAULT_LIMIT`].
pub fn validate_limit(raw: Option<&str>) -> Result<i64, ValidationError> {
    let Some(value) = raw.filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_LIMIT);
    };
    let limit: i64 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_integer("limit"))?;
    if limit < 0 {
        return Err(ValidationError::below_minimum("limit", 0));
    }
    Ok(limit)
}

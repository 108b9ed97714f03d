//! Trading results domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::cache::codec::{encode_record, CacheEncode, Record};

/// One row of exchange trading results for a product on a trading day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingResult {
    pub id: i32,
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: i64,
    pub total: i64,
    pub count: i64,
    pub date: NaiveDate,
    pub created_on: NaiveDateTime,
    pub updated_on: NaiveDateTime,
}

impl Record for TradingResult {
    fn columns(&self) -> Map<String, Value> {
        let mut columns = Map::new();
        columns.insert("id".into(), json!(self.id));
        columns.insert("exchange_product_id".into(), json!(self.exchange_product_id));
        columns.insert(
            "exchange_product_name".into(),
            json!(self.exchange_product_name),
        );
        columns.insert("oil_id".into(), json!(self.oil_id));
        columns.insert("delivery_basis_id".into(), json!(self.delivery_basis_id));
        columns.insert(
            "delivery_basis_name".into(),
            json!(self.delivery_basis_name),
        );
        columns.insert("delivery_type_id".into(), json!(self.delivery_type_id));
        columns.insert("volume".into(), json!(self.volume));
        columns.insert("total".into(), json!(self.total));
        columns.insert("count".into(), json!(self.count));
        columns.insert("date".into(), self.date.to_cache_value());
        columns.insert("created_on".into(), self.created_on.to_cache_value());
        columns.insert("updated_on".into(), self.updated_on.to_cache_value());
        columns
    }
}

impl CacheEncode for TradingResult {
    fn to_cache_value(&self) -> Value {
        encode_record(self)
    }
}

/// Input model for inserting a trading result row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTradingResult {
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: i64,
    pub total: i64,
    pub count: i64,
    pub date: NaiveDate,
}

/// Raw attribute filter exactly as it arrives in a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TradingFilterQuery {
    pub oil_id: Option<String>,
    pub delivery_type_id: Option<String>,
    pub delivery_basis_id: Option<String>,
}

/// Raw date-range filter exactly as it arrives in a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DateRangeQuery {
    #[serde(flatten)]
    pub filter: TradingFilterQuery,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated product/delivery attribute filter. `None` matches any value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TradingFilter {
    pub oil_id: Option<String>,
    pub delivery_type_id: Option<String>,
    pub delivery_basis_id: Option<String>,
}

impl TradingFilter {
    pub fn is_empty(&self) -> bool {
        self.oil_id.is_none() && self.delivery_type_id.is_none() && self.delivery_basis_id.is_none()
    }
}

/// Validated attribute filter over an inclusive, ordered date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRangeFilter {
    #[serde(flatten)]
    pub filter: TradingFilter,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRangeFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

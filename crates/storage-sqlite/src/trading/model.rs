//! Database models for trading results.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use spimex_core::trading::{NewTradingResult, TradingResult};

/// Database model for a trading result row
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::trading_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradingResultDB {
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

/// Database model for inserting a trading result; timestamps use column defaults.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::trading_results)]
pub struct NewTradingResultDB {
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

// Conversion to domain models
impl From<TradingResultDB> for TradingResult {
    fn from(db: TradingResultDB) -> Self {
        Self {
            id: db.id,
            exchange_product_id: db.exchange_product_id,
            exchange_product_name: db.exchange_product_name,
            oil_id: db.oil_id,
            delivery_basis_id: db.delivery_basis_id,
            delivery_basis_name: db.delivery_basis_name,
            delivery_type_id: db.delivery_type_id,
            volume: db.volume,
            total: db.total,
            count: db.count,
            date: db.date,
            created_on: db.created_on,
            updated_on: db.updated_on,
        }
    }
}

// Conversion from domain models
impl From<NewTradingResult> for NewTradingResultDB {
    fn from(domain: NewTradingResult) -> Self {
        Self {
            exchange_product_id: domain.exchange_product_id,
            exchange_product_name: domain.exchange_product_name,
            oil_id: domain.oil_id,
            delivery_basis_id: domain.delivery_basis_id,
            delivery_basis_name: domain.delivery_basis_name,
            delivery_type_id: domain.delivery_type_id,
            volume: domain.volume,
            total: domain.total,
            count: domain.count,
            date: domain.date,
        }
    }
}

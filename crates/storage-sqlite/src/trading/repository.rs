use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use spimex_core::trading::{
    DateRangeFilter, NewTradingResult, TradingFilter, TradingRepositoryTrait, TradingResult,
};
use spimex_core::Result;

use super::model::{NewTradingResultDB, TradingResultDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::trading_results;

pub struct TradingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TradingRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        TradingRepository { pool, writer }
    }

    /// Boxed query over `trading_results` restricted to the filter's present attributes.
    fn filtered(filter: &TradingFilter) -> trading_results::BoxedQuery<'static, Sqlite> {
        let mut query = trading_results::table.into_boxed();
        if let Some(oil) = &filter.oil_id {
            query = query.filter(trading_results::oil_id.eq(oil.clone()));
        }
        if let Some(kind) = &filter.delivery_type_id {
            query = query.filter(trading_results::delivery_type_id.eq(kind.clone()));
        }
        if let Some(basis) = &filter.delivery_basis_id {
            query = query.filter(trading_results::delivery_basis_id.eq(basis.clone()));
        }
        query
    }
}

#[async_trait]
impl TradingRepositoryTrait for TradingRepository {
    fn last_trading_dates(&self, limit: i64) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let dates = trading_results::table
            .select(trading_results::date)
            .distinct()
            .order(trading_results::date.desc())
            .limit(limit)
            .load::<NaiveDate>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(dates)
    }

    fn dynamics(&self, filter: &DateRangeFilter) -> Result<Vec<TradingResult>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = Self::filtered(&filter.filter)
            .filter(trading_results::date.ge(filter.start_date))
            .filter(trading_results::date.le(filter.end_date))
            .order((trading_results::date.asc(), trading_results::id.asc()))
            .load::<TradingResultDB>(&mut conn)
            .map_err(StorageError::from)?;
        debug!(
            "Loaded {} trading results for {}..={}",
            rows.len(),
            filter.start_date,
            filter.end_date
        );
        Ok(rows.into_iter().map(TradingResult::from).collect())
    }

    fn latest_results(&self, filter: &TradingFilter, limit: i64) -> Result<Vec<TradingResult>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = Self::filtered(filter)
            .order((trading_results::date.desc(), trading_results::id.desc()))
            .limit(limit)
            .load::<TradingResultDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(TradingResult::from).collect())
    }

    async fn insert_results(&self, results: Vec<NewTradingResult>) -> Result<usize> {
        let rows: Vec<NewTradingResultDB> = results.into_iter().map(Into::into).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::insert_into(trading_results::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

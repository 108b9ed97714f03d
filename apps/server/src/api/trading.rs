use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use spimex_core::cache::{KeyParams, KeyPolicy};
use spimex_core::trading::{
    validate_date_range, validate_filter, validate_limit, DateRangeQuery, TradingFilterQuery,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
pub struct LastDatesQuery {
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LastTradingQuery {
    #[serde(flatten)]
    filter: TradingFilterQuery,
    limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/last_dates",
    params(("limit" = Option<i64>, Query, description = "Number of trading days to return (default 5)")),
    responses(
        (status = 200, description = "Distinct trading days, newest first", body = [String]),
        (status = 422, description = "Invalid query", body = crate::models::HttpValidationError)
    )
)]
pub async fn last_dates(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LastDatesQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(q) = query?;
    let limit = validate_limit(q.limit.as_deref())?;

    let key = state.cache.key(
        KeyPolicy::LastDates,
        "trading::get_last_trading_dates",
        "last_dates",
        &KeyParams::new().with("limit", &limit),
    );
    let value = state
        .cache
        .get_or_compute(&key, state.ttl_policy.ttl(), || async {
            state.trading_service.get_last_trading_dates(limit)
        })
        .await?;
    Ok(Json(value))
}

#[utoipa::path(
    get,
    path = "/trading_dynamic",
    params(
        ("oil_id" = Option<String>, Query, description = "Oil product code, 4 characters"),
        ("delivery_type_id" = Option<String>, Query, description = "Delivery type, 1 capital letter"),
        ("delivery_basis_id" = Option<String>, Query, description = "Delivery basis, 3 capital letters"),
        ("start_date" = String, Query, description = "Range start, YYYY-MM-DD"),
        ("end_date" = String, Query, description = "Range end, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Trading results in the date range", body = [crate::models::TradingResult]),
        (status = 422, description = "Invalid query", body = crate::models::HttpValidationError)
    )
)]
pub async fn trading_dynamic(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(q) = query?;
    let filter = validate_date_range(&q, Local::now().date_naive())?;

    let key = state.cache.key(
        KeyPolicy::Dynamics,
        "trading::get_dynamics",
        "trading_dynamic",
        &KeyParams::new().with("data", &filter),
    );
    let value = state
        .cache
        .get_or_compute(&key, state.ttl_policy.ttl(), || async {
            state.trading_service.get_dynamics(&filter)
        })
        .await?;
    Ok(Json(value))
}

#[utoipa::path(
    get,
    path = "/last_trading",
    params(
        ("oil_id" = Option<String>, Query, description = "Oil product code, 4 characters"),
        ("delivery_type_id" = Option<String>, Query, description = "Delivery type, 1 capital letter"),
        ("delivery_basis_id" = Option<String>, Query, description = "Delivery basis, 3 capital letters"),
        ("limit" = Option<i64>, Query, description = "Number of rows to return (default 5)")
    ),
    responses(
        (status = 200, description = "Latest trading results", body = [crate::models::TradingResult]),
        (status = 422, description = "Invalid query", body = crate::models::HttpValidationError)
    )
)]
pub async fn last_trading(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LastTradingQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(q) = query?;
    let filter = validate_filter(&q.filter)?;
    let limit = validate_limit(q.limit.as_deref())?;

    let key = state.cache.key(
        KeyPolicy::Dynamics,
        "trading::get_trading_results",
        "last_trading",
        &KeyParams::new()
            .with("data", &filter)
            .with("limit", &limit),
    );
    let value = state
        .cache
        .get_or_compute(&key, state.ttl_policy.ttl(), || async {
            state.trading_service.get_trading_results(&filter, limit)
        })
        .await?;
    Ok(Json(value))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/last_dates", get(last_dates))
        .route("/trading_dynamic", get(trading_dynamic))
        .route("/last_trading", get(last_trading))
}

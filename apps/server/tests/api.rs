use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use spimex_core::trading::NewTradingResult;
use spimex_server::{api::app_router, build_state, config::Config, models, AppState};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(
    product: &str,
    oil_id: &str,
    basis: &str,
    kind: &str,
    volume: i64,
    total: i64,
    count: i64,
    on: NaiveDate,
) -> NewTradingResult {
    NewTradingResult {
        exchange_product_id: product.to_string(),
        exchange_product_name: format!("Product {}", product),
        oil_id: oil_id.to_string(),
        delivery_basis_id: basis.to_string(),
        delivery_basis_name: format!("Basis {}", basis),
        delivery_type_id: kind.to_string(),
        volume,
        total,
        count,
        date: on,
    }
}

fn fixture() -> Vec<NewTradingResult> {
    vec![
        record("A592AKR060F", "A592", "AKR", "F", 1440, 52_917_120, 19, date(2023, 1, 9)),
        record("A925KIT025A", "A925", "KIT", "A", 650, 25_165_000, 11, date(2024, 10, 1)),
        record("DSC5NVL005A", "DSC5", "NVL", "A", 115, 5_819_000, 4, date(2025, 3, 23)),
    ]
}

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config::with_db_path(dir.path().join("test.db").to_string_lossy());
    let state = build_state(&config).await.unwrap();
    state.trading_service.import_results(fixture()).await.unwrap();
    TestApp {
        router: app_router(state.clone(), &config),
        state,
        _dir: dir,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_len(router: &Router, uri: &str) -> usize {
    let (status, body) = get(router, uri).await;
    assert_eq!(status, StatusCode::OK, "{} -> {}", uri, body);
    body.as_array().unwrap().len()
}

async fn assert_rejected(router: &Router, uri: &str) -> Value {
    let (status, body) = get(router, uri).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} -> {}", uri, body);
    let detail = body["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 1, "{} -> {}", uri, body);
    detail[0].clone()
}

const RANGE: &str = "start_date=2023-01-09&end_date=2025-03-23";

#[tokio::test]
async fn last_dates_respects_limit() {
    let app = test_app().await;
    assert_eq!(get_len(&app.router, "/last_dates?limit=1").await, 1);
    assert_eq!(get_len(&app.router, "/last_dates?limit=2").await, 2);
    assert_eq!(get_len(&app.router, "/last_dates?limit=3").await, 3);
    assert_eq!(get_len(&app.router, "/last_dates?limit=5").await, 3);

    let (_, body) = get(&app.router, "/last_dates").await;
    assert_eq!(
        body,
        serde_json::json!(["2025-03-23", "2024-10-01", "2023-01-09"])
    );
}

#[tokio::test]
async fn last_dates_rejects_bad_limit() {
    let app = test_app().await;
    let detail = assert_rejected(&app.router, "/last_dates?limit=abc").await;
    assert_eq!(detail["type"], "int_parsing");
    let detail = assert_rejected(&app.router, "/last_dates?limit=-1").await;
    assert_eq!(detail["loc"], serde_json::json!(["query", "limit"]));
}

#[tokio::test]
async fn unparsable_query_string_is_a_validation_error() {
    let app = test_app().await;
    let detail = assert_rejected(&app.router, "/last_dates?limit=1&limit=2").await;
    assert_eq!(detail["loc"], serde_json::json!(["query"]));
    assert_eq!(detail["type"], "query_parsing");
    assert!(detail["msg"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn trading_dynamic_filters_by_date_range() {
    let app = test_app().await;
    assert_eq!(
        get_len(&app.router, &format!("/trading_dynamic?{}", RANGE)).await,
        3
    );
    assert_eq!(
        get_len(
            &app.router,
            "/trading_dynamic?start_date=2023-01-09&end_date=2023-03-23"
        )
        .await,
        1
    );

    let detail = assert_rejected(
        &app.router,
        "/trading_dynamic?start_date=2025-03-23&end_date=2023-01-09",
    )
    .await;
    assert_eq!(detail["type"], "value_error");
}

#[tokio::test]
async fn trading_dynamic_rejects_missing_and_future_dates() {
    let app = test_app().await;
    let detail = assert_rejected(&app.router, "/trading_dynamic?end_date=2023-01-09").await;
    assert_eq!(detail["loc"], serde_json::json!(["query", "start_date"]));
    assert_eq!(detail["type"], "missing");

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let detail = assert_rejected(
        &app.router,
        &format!("/trading_dynamic?start_date=2023-01-09&end_date={}", tomorrow),
    )
    .await;
    assert_eq!(detail["loc"], serde_json::json!(["query", "end_date"]));
}

#[tokio::test]
async fn trading_dynamic_filters_by_attributes() {
    let app = test_app().await;
    let uri = |params: &str| format!("/trading_dynamic?{}&{}", RANGE, params);

    assert_eq!(get_len(&app.router, &uri("oil_id=A592")).await, 1);
    assert_rejected(&app.router, &uri("oil_id=A5922")).await;

    assert_eq!(get_len(&app.router, &uri("delivery_type_id=A")).await, 2);
    assert_rejected(&app.router, &uri("delivery_type_id=1")).await;

    assert_eq!(get_len(&app.router, &uri("delivery_basis_id=AKR")).await, 1);
    let detail = assert_rejected(&app.router, &uri("delivery_basis_id=AK1R")).await;
    assert_eq!(detail["type"], "string_pattern_mismatch");
}

#[tokio::test]
async fn trading_dynamic_returns_full_rows() {
    let app = test_app().await;
    let (status, body) = get(
        &app.router,
        &format!("/trading_dynamic?{}&oil_id=A592", RANGE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows: Vec<models::TradingResult> = serde_json::from_value(body).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].exchange_product_id, "A592AKR060F");
    assert_eq!(rows[0].delivery_basis_id, "AKR");
    assert_eq!(rows[0].volume, 1440);
    assert_eq!(rows[0].total, 52_917_120);
    assert_eq!(rows[0].count, 19);
    assert_eq!(rows[0].date, date(2023, 1, 9));
}

#[tokio::test]
async fn last_trading_respects_limit_and_filters() {
    let app = test_app().await;
    assert_eq!(get_len(&app.router, "/last_trading?limit=1").await, 1);
    assert_eq!(get_len(&app.router, "/last_trading?limit=3").await, 3);
    assert_eq!(get_len(&app.router, "/last_trading?limit=5").await, 3);

    assert_eq!(get_len(&app.router, "/last_trading?oil_id=A592").await, 1);
    assert_rejected(&app.router, "/last_trading?oil_id=A5922").await;

    assert_eq!(get_len(&app.router, "/last_trading?delivery_type_id=A").await, 2);
    assert_rejected(&app.router, "/last_trading?delivery_type_id=Aa").await;

    assert_eq!(get_len(&app.router, "/last_trading?delivery_basis_id=NVL").await, 1);
    assert_rejected(&app.router, "/last_trading?delivery_basis_id=NVAL").await;
}

#[tokio::test]
async fn last_trading_is_newest_first() {
    let app = test_app().await;
    let (_, body) = get(&app.router, "/last_trading?limit=2").await;
    let rows: Vec<models::TradingResult> = serde_json::from_value(body).unwrap();
    assert_eq!(rows[0].oil_id, "DSC5");
    assert_eq!(rows[1].oil_id, "A925");
}

#[tokio::test]
async fn responses_are_served_from_cache_until_cleared() {
    let app = test_app().await;
    assert_eq!(get_len(&app.router, "/last_dates").await, 3);

    app.state
        .trading_service
        .import_results(vec![record(
            "A100ANK060F",
            "A100",
            "ANK",
            "F",
            10,
            1000,
            1,
            date(2025, 1, 15),
        )])
        .await
        .unwrap();
    assert_eq!(get_len(&app.router, "/last_dates").await, 3);
    assert_eq!(get_len(&app.router, "/last_dates?limit=10").await, 4);

    app.state.cache.clear().await.unwrap();
    assert_eq!(get_len(&app.router, "/last_dates").await, 4);
}

#[tokio::test]
async fn unknown_routes_return_error_body() {
    let app = test_app().await;
    let (status, body) = get(&app.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

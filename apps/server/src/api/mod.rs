use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::ApiError, main_lib::AppState, models};

pub mod trading;

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(healthz, trading::last_dates, trading::trading_dynamic, trading::last_trading),
    components(schemas(
        models::TradingResult,
        models::ValidationErrorDetail,
        models::HttpValidationError
    )),
    tags((name = "spimex"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        .route("/healthz", get(healthz))
        .merge(trading::router())
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .fallback(|| async { ApiError::NotFound })
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

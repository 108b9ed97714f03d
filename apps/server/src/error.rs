use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spimex_core::errors::{Error as CoreError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(err))
    }
}

/// Unparsable query strings are reported like any other invalid parameter.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::malformed_query(&rejection.body_text()).into()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

/// One entry of a 422 response's `detail` list.
#[derive(Serialize)]
struct ValidationDetail<'a> {
    loc: &'a [String],
    msg: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    detail: Vec<ValidationDetail<'a>>,
}

fn validation_response(err: &ValidationError) -> Response {
    let body = ValidationBody {
        detail: vec![ValidationDetail {
            loc: &err.loc,
            msg: &err.msg,
            kind: err.kind.as_str(),
        }],
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(CoreError::Validation(e)) => return validation_response(e),
            ApiError::Core(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

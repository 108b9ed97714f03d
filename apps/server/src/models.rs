use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response shape of one trading result row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
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

/// One entry of a 422 response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HttpValidationError {
    pub detail: Vec<ValidationErrorDetail>,
}

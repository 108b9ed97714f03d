//! JSON codec for cached responses.
//!
//! Records (values with a fixed set of named columns) are flattened into a
//! column-name to value mapping, sequences are encoded element by element in
//! order, and anything else is emitted as-is. Values that JSON cannot
//! represent natively are stored in their string form, so encoding never
//! fails.

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::DATE_FORMAT;

/// A value exposing a fixed set of named columns.
pub trait Record {
    fn columns(&self) -> Map<String, Value>;
}

/// Conversion of a value into its cacheable JSON form.
pub trait CacheEncode {
    fn to_cache_value(&self) -> Value;
}

/// Flattens a record into a column-name to value mapping.
pub fn encode_record<R: Record + ?Sized>(record: &R) -> Value {
    Value::Object(record.columns())
}

/// Serializes any `Serialize` value, falling back to its string form when serde rejects it.
pub fn to_value_or_string<T: Serialize + Display + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

impl<T: CacheEncode> CacheEncode for [T] {
    fn to_cache_value(&self) -> Value {
        Value::Array(self.iter().map(CacheEncode::to_cache_value).collect())
    }
}

impl<T: CacheEncode> CacheEncode for Vec<T> {
    fn to_cache_value(&self) -> Value {
        self.as_slice().to_cache_value()
    }
}

impl<T: CacheEncode> CacheEncode for Option<T> {
    fn to_cache_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, CacheEncode::to_cache_value)
    }
}

impl<T: CacheEncode + ?Sized> CacheEncode for &T {
    fn to_cache_value(&self) -> Value {
        (**self).to_cache_value()
    }
}

impl CacheEncode for Value {
    fn to_cache_value(&self) -> Value {
        self.clone()
    }
}

impl CacheEncode for NaiveDate {
    fn to_cache_value(&self) -> Value {
        Value::String(self.format(DATE_FORMAT).to_string())
    }
}

impl CacheEncode for NaiveDateTime {
    fn to_cache_value(&self) -> Value {
        Value::String(self.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

macro_rules! impl_cache_encode_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CacheEncode for $ty {
                fn to_cache_value(&self) -> Value {
                    to_value_or_string(self)
                }
            }
        )*
    };
}

impl_cache_encode_scalar!(String, str, bool, i32, i64, u32, u64);

impl CacheEncode for f64 {
    fn to_cache_value(&self) -> Value {
        serde_json::Number::from_f64(*self)
            .map_or_else(|| Value::String(self.to_string()), Value::Number)
    }
}

/// Encodes a value into the UTF-8 JSON payload stored in the cache.
pub fn encode<T: CacheEncode + ?Sized>(value: &T) -> Vec<u8> {
    value.to_cache_value().to_string().into_bytes()
}

/// A payload read back from a cache backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    /// Already structured; decoding is the identity.
    Structured(Value),
    Bytes(Vec<u8>),
    Text(String),
}

impl From<Vec<u8>> for CachedPayload {
    fn from(bytes: Vec<u8>) -> Self {
        CachedPayload::Bytes(bytes)
    }
}

impl From<String> for CachedPayload {
    fn from(text: String) -> Self {
        CachedPayload::Text(text)
    }
}

impl From<Value> for CachedPayload {
    fn from(value: Value) -> Self {
        CachedPayload::Structured(value)
    }
}

/// Parses a cached payload back into structured JSON.
pub fn decode(payload: CachedPayload) -> Result<Value, serde_json::Error> {
    match payload {
        CachedPayload::Structured(value) => Ok(value),
        CachedPayload::Bytes(bytes) => serde_json::from_slice(&bytes),
        CachedPayload::Text(text) => serde_json::from_str(&text),
    }
}

//! Cache key derivation.
//!
//! A key is `{namespace}:{digest}` where the digest is the SHA-256 of the
//! function identity and the canonical JSON of the parameters that affect
//! the result. Only value content reaches the digest, so keys survive process
//! restarts.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Named call parameters offered to the key deriver.
///
/// Values are plain JSON, so live handles such as a database pool can never
/// be part of a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyParams(BTreeMap<String, Value>);

impl KeyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, serializing it to JSON. Unserializable values become `null`.
    pub fn with<T: Serialize + ?Sized>(mut self, name: &str, value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Which parameters a cached endpoint is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// `data` always, `limit` only when truthy.
    Dynamics,
    /// Only the raw `limit` value.
    LastDates,
}

impl KeyPolicy {
    /// Selects the parameters that participate in the key.
    fn relevant(&self, params: &KeyParams) -> Value {
        match self {
            KeyPolicy::Dynamics => {
                let mut selected = serde_json::Map::new();
                selected.insert(
                    "data".to_string(),
                    params.get("data").cloned().unwrap_or(Value::Null),
                );
                if let Some(limit) = params.get("limit").filter(|v| is_truthy(v)) {
                    selected.insert("limit".to_string(), limit.clone());
                }
                Value::Object(selected)
            }
            KeyPolicy::LastDates => params.get("limit").cloned().unwrap_or(Value::Null),
        }
    }
}

/// Truthiness of a JSON parameter value: `null`, `false`, zero and empty
/// containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Serializes JSON with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let body = sorted
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), canonical_json(v)))
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{}}}", body)
        }
        Value::Array(items) => {
            let body = items.iter().map(canonical_json).collect::<Vec<_>>().join(",");
            format!("[{}]", body)
        }
        scalar => scalar.to_string(),
    }
}

/// Derives the cache key for one invocation of `function`.
pub fn derive_key(policy: KeyPolicy, function: &str, namespace: &str, params: &KeyParams) -> String {
    let relevant = policy.relevant(params);

    let mut hasher = Sha256::new();
    hasher.update(function.as_bytes());
    hasher.update(b":");
    hasher.update(canonical_json(&relevant).as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("{}:{}", namespace, digest)
}

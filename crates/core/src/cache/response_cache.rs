//! Read-through caching stage placed in front of a query.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use super::backend::CacheBackend;
use super::codec::{decode, encode, CacheEncode, CachedPayload};
use super::key::{derive_key, KeyParams, KeyPolicy};
use crate::errors::Result;

/// Interceptor consulting a [`CacheBackend`] before running a query.
///
/// On a hit the stored payload is decoded and returned; on a miss the query
/// runs, its result is encoded and stored with the given TTL. Backend
/// failures and unreadable payloads degrade to a miss.
pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn CacheBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full backend key for one invocation: `{prefix}:{namespace}:{digest}`.
    pub fn key(
        &self,
        policy: KeyPolicy,
        function: &str,
        namespace: &str,
        params: &KeyParams,
    ) -> String {
        let namespace = format!("{}:{}", self.prefix, namespace);
        derive_key(policy, function, &namespace, params)
    }

    /// Returns the cached value under `key`, or computes, stores and returns it.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<Value>
    where
        T: CacheEncode,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.lookup(key).await {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }
        debug!("Cache miss for {}", key);

        let fresh = compute().await?;
        let value = fresh.to_cache_value();
        let payload = encode(&value);
        if let Err(e) = self.backend.set(key, payload, ttl).await {
            warn!("Failed to store cache entry {}: {}", key, e);
        }
        Ok(value)
    }

    async fn lookup(&self, key: &str) -> Option<Value> {
        let bytes = match self.backend.get(key).await {
            Ok(hit) => hit?,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };
        match decode(CachedPayload::Bytes(bytes)) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }
}

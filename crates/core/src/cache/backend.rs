//! Cache store abstraction and the in-process implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::Result;

/// A key-value store holding encoded responses with a time-to-live.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

struct CacheEntry {
    value: Vec<u8>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Thread-safe in-memory store with per-entry expiration.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(Instant::now()) {
                return Ok(Some(entry.value.clone()));
            }
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

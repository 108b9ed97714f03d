//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use spimex_core::cache::CacheBackend;
use spimex_core::errors::{Error, Result};

fn cache_err(e: redis::RedisError) -> Error {
    Error::Cache(e.to_string())
}

/// Seconds for `SET .. EX`; Redis rejects an EX of zero.
fn expire_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn clear_pattern(prefix: &str) -> String {
    format!("{}:*", prefix)
}

/// Store keeping entries in Redis with `SET .. EX`.
///
/// `clear` only removes keys under this store's prefix.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            prefix: prefix.into(),
        })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(cache_err)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let ttl_secs = expire_secs(ttl);
        let _: () = conn.set_ex(key, value, ttl_secs).await.map_err(cache_err)?;
        tracing::debug!("cache SET {key} (ttl={ttl_secs}s)");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pattern = clear_pattern(&self.prefix);
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(cache_err)?;
            if !keys.is_empty() {
                let _: () = conn.del(&keys).await.map_err(cache_err)?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(())
    }
}

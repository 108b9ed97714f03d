use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use spimex_core::constants::DEFAULT_CACHE_PREFIX;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Redis connection URL; the in-process cache is used when unset.
    pub redis_url: Option<String>,
    pub cache_prefix: String,
    /// Fixed TTL overriding the daily cutoff policy.
    pub cache_ttl: Option<Duration>,
    pub log_format: LogFormat,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = var("SPIMEX_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SPIMEX_LISTEN_ADDR")?;
        let db_path = var("SPIMEX_DB_PATH").unwrap_or_else(|| "./db/spimex.db".into());
        let cors_allow = var("SPIMEX_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("SPIMEX_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);
        let cache_ttl = var("SPIMEX_CACHE_TTL_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("Invalid SPIMEX_CACHE_TTL_SECS")?
            .map(Duration::from_secs);
        let log_format = match var("SPIMEX_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            redis_url: var("SPIMEX_REDIS_URL"),
            cache_prefix: var("SPIMEX_CACHE_PREFIX").unwrap_or_else(|| DEFAULT_CACHE_PREFIX.into()),
            cache_ttl,
            log_format,
        })
    }

    /// Defaults for a database at `db_path`, ignoring the environment.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            redis_url: None,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            cache_ttl: None,
            log_format: LogFormat::Text,
        }
    }
}

use std::sync::Arc;

use crate::config::{Config, LogFormat};
use crate::redis_cache::RedisBackend;
use spimex_core::cache::{CacheBackend, InMemoryBackend, ResponseCache, TtlPolicy};
use spimex_core::trading::{TradingService, TradingServiceTrait};
use spimex_storage_sqlite::{db, trading::TradingRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub trading_service: Arc<dyn TradingServiceTrait + Send + Sync>,
    pub cache: Arc<ResponseCache>,
    pub ttl_policy: TtlPolicy,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

async fn build_cache(config: &Config) -> anyhow::Result<Arc<ResponseCache>> {
    let backend: Arc<dyn CacheBackend> = match &config.redis_url {
        Some(url) => {
            tracing::info!("Using Redis cache backend");
            Arc::new(RedisBackend::connect(url, config.cache_prefix.clone()).await?)
        }
        None => {
            tracing::info!("Using in-memory cache backend");
            Arc::new(InMemoryBackend::new())
        }
    };
    Ok(Arc::new(ResponseCache::new(
        backend,
        config.cache_prefix.clone(),
    )))
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let trading_repo = Arc::new(TradingRepository::new(pool.clone(), writer));
    let trading_service: Arc<dyn TradingServiceTrait + Send + Sync> =
        Arc::new(TradingService::new(trading_repo));

    let cache = build_cache(config).await?;
    let ttl_policy = config
        .cache_ttl
        .map(TtlPolicy::Fixed)
        .unwrap_or_default();

    Ok(Arc::new(AppState {
        trading_service,
        cache,
        ttl_policy,
    }))
}

//! Response caching: key derivation, expiration policy, payload codec and the
//! read-through interceptor.
//!
//! ```text
//! request ─► validate ─► derive_key ─► ResponseCache ─► CacheBackend
//!                                            │ miss
//!                                            ▼
//!                                    TradingServiceTrait
//! ```

pub mod backend;
pub mod codec;
pub mod expiration;
pub mod key;
mod response_cache;

pub use backend::{CacheBackend, InMemoryBackend};
pub use codec::{decode, encode, CacheEncode, CachedPayload, Record};
pub use expiration::{compute_expiration, ttl_until_cutoff, TtlPolicy};
pub use key::{derive_key, KeyParams, KeyPolicy};
pub use response_cache::ResponseCache;

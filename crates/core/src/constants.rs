/// Number of rows (or trading days) returned when the request omits `limit`.
pub const DEFAULT_LIMIT: i64 = 5;

/// Identifier patterns accepted by the request filters.
pub const OIL_ID_PATTERN: &str = r"^[A-Z0-9\-]{4}$";
pub const DELIVERY_TYPE_ID_PATTERN: &str = r"^[A-Z]{1}$";
pub const DELIVERY_BASIS_ID_PATTERN: &str = r"^[A-Z]{3}$";

/// Date format used in query strings and cached payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hour and minute (local time) at which the exchange publishes the day's results.
pub const CACHE_CUTOFF_HOUR: u32 = 14;
pub const CACHE_CUTOFF_MINUTE: u32 = 11;

/// Prefix prepended to every cache key.
pub const DEFAULT_CACHE_PREFIX: &str = "spimex-cache";

//! Time-to-live policy for cached responses.
//!
//! Trading results are published once a day, so cached entries expire at the
//! next daily cutoff (14:11 local time).

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};

use crate::constants::{CACHE_CUTOFF_HOUR, CACHE_CUTOFF_MINUTE};

/// Local time of day at which cached results go stale.
pub fn cutoff_time() -> NaiveTime {
    NaiveTime::from_hms_opt(CACHE_CUTOFF_HOUR, CACHE_CUTOFF_MINUTE, 0).unwrap_or_default()
}

/// Time from `now` until the next cutoff.
///
/// Before the cutoff this is the time left today; at or after the cutoff it is
/// the time until tomorrow's cutoff. The result is always positive and never
/// longer than one day.
pub fn compute_expiration(now: NaiveDateTime) -> Duration {
    let cutoff_today = now.date().and_time(cutoff_time());
    if now < cutoff_today {
        cutoff_today - now
    } else {
        (cutoff_today + Duration::days(1)) - now
    }
}

/// [`compute_expiration`] evaluated at the current local time.
pub fn ttl_until_cutoff() -> std::time::Duration {
    to_std(compute_expiration(Local::now().naive_local()))
}

fn to_std(duration: Duration) -> std::time::Duration {
    duration.to_std().unwrap_or(std::time::Duration::ZERO)
}

/// How long a cached endpoint keeps its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtlPolicy {
    /// Expire at the next daily cutoff.
    #[default]
    UntilDailyCutoff,
    /// Expire after a fixed duration.
    Fixed(std::time::Duration),
}

impl TtlPolicy {
    /// Resolves the policy to a concrete TTL at `now`.
    pub fn ttl_at(&self, now: NaiveDateTime) -> std::time::Duration {
        match self {
            TtlPolicy::UntilDailyCutoff => to_std(compute_expiration(now)),
            TtlPolicy::Fixed(ttl) => *ttl,
        }
    }

    /// Resolves the policy to a concrete TTL at the current local time.
    pub fn ttl(&self) -> std::time::Duration {
        match self {
            TtlPolicy::UntilDailyCutoff => ttl_until_cutoff(),
            TtlPolicy::Fixed(ttl) => *ttl,
        }
    }
}

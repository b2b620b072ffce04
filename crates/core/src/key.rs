//! Natural keys for shop records.
//!
//! Inventory items have no generated id: the ISO-8601 creation timestamp is the
//! identity. `KeyClock` hands out those timestamps and guarantees that two keys
//! issued by the same clock never collide, even within one millisecond.

use core::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

const KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// `createdAt` natural key of an inventory item.
///
/// Stored verbatim so that snapshots written by older builds (or by hand)
/// round-trip unchanged; use [`ItemKey::timestamp`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Wrap a raw key without interpreting it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for an exact instant (millisecond precision, UTC, `Z` suffix).
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.format(KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key as an RFC 3339 timestamp.
    pub fn timestamp(&self) -> DomainResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::invalid_key(format!("{}: {e}", self.0)))
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemKey {
    type Err = DomainError;

    /// Strict parse: the string must be a valid RFC 3339 timestamp.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = Self::new(s);
        key.timestamp()?;
        Ok(key)
    }
}

/// Strictly monotonic source of [`ItemKey`]s.
#[derive(Debug, Default)]
pub struct KeyClock {
    last_millis: Mutex<Option<i64>>,
}

impl KeyClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key based on the current wall clock.
    pub fn next(&self) -> ItemKey {
        self.next_at(Utc::now())
    }

    /// Next key for the given instant.
    ///
    /// When `now` does not advance past the previously issued key (same
    /// millisecond, or the wall clock stepped backwards) the key is bumped to
    /// one millisecond after the previous one.
    pub fn next_at(&self, now: DateTime<Utc>) -> ItemKey {
        let mut last = self
            .last_millis
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now_millis = now.timestamp_millis();
        let chosen = match *last {
            Some(prev) if prev >= now_millis => prev + 1,
            _ => now_millis,
        };
        *last = Some(chosen);

        ItemKey::from_timestamp(now + Duration::milliseconds(chosen - now_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap() + Duration::milliseconds(589)
    }

    #[test]
    fn formats_like_iso_string_with_millis() {
        let key = ItemKey::from_timestamp(instant());
        assert_eq!(key.as_str(), "2025-03-14T09:26:53.589Z");
        assert_eq!(key.timestamp().unwrap(), instant());
    }

    #[test]
    fn clock_bumps_keys_issued_in_the_same_millisecond() {
        let clock = KeyClock::new();
        let a = clock.next_at(instant());
        let b = clock.next_at(instant());
        let c = clock.next_at(instant() + Duration::microseconds(300));

        assert_eq!(a.as_str(), "2025-03-14T09:26:53.589Z");
        assert_eq!(b.as_str(), "2025-03-14T09:26:53.590Z");
        assert_eq!(c.as_str(), "2025-03-14T09:26:53.591Z");
    }

    #[test]
    fn clock_never_goes_backwards() {
        let clock = KeyClock::new();
        let first = clock.next_at(instant());
        let second = clock.next_at(instant() - Duration::seconds(5));
        assert!(second.timestamp().unwrap() > first.timestamp().unwrap());
    }

    #[test]
    fn strict_parse_rejects_non_timestamps() {
        assert!(ItemKey::from_str("yesterday").is_err());
        assert!(ItemKey::from_str("2025-03-14T09:26:53.589Z").is_ok());
        // Lenient constructor keeps anything verbatim.
        assert_eq!(ItemKey::new("yesterday").as_str(), "yesterday");
    }
}

//! # Temporal Types
//!
//! UTC-only timestamp used for completion events, truncated to seconds at
//! construction. Serialized as ISO 8601 with a `Z` suffix.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp with no sub-second component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Wrap an existing `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO 8601 with `Z` suffix, truncated to seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn canonical_string_has_z_suffix_and_no_fraction() {
        let dt = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
            .unwrap()
            .with_nanosecond(250_000_000)
            .unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.to_canonical_string(), "2026-01-15T12:00:00Z");
        assert_eq!(ts.to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn sub_seconds_are_dropped_at_construction() {
        let dt = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
            .unwrap()
            .with_nanosecond(999_999_999)
            .unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2026-01-15T12:00:00Z\""
        );
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }
}

//! Timestamp parsing and normalization
//!
//! Ingest timestamps may be naive or offset-bearing. Offset-bearing values
//! are normalized to their wall-clock reading so that equality and
//! subtraction are well-defined against the naive timestamps of other
//! inputs sharing the same offset convention.

use chrono::{DateTime, NaiveDateTime};

use crate::{PredictError, Result};

/// Parse a timestamp string into a naive local datetime
///
/// Supports:
/// - RFC 3339 / ISO-8601 with offset: "2015-07-13T12:00:00-04:00" (the
///   offset designator is dropped, the wall-clock reading kept)
/// - Naive ISO-8601: "2015-07-13T12:00:00" (fractional seconds accepted)
/// - Unix milliseconds: "1436788800000"
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }

    if let Ok(millis) = s.parse::<i64>() {
        return from_epoch_millis(millis);
    }

    Err(PredictError::InvalidTimestamp(s.to_string()))
}

/// Convert Unix milliseconds to a naive datetime (UTC wall clock)
pub fn from_epoch_millis(millis: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| PredictError::InvalidTimestamp(millis.to_string()))
}

/// Signed minutes from `earlier` to `later`
pub fn minutes_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

/// Serde adapter serializing naive timestamps as ISO-8601 without offset
#[cfg(feature = "serde")]
pub mod serde_naive {
    use chrono::NaiveDateTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(D::Error::custom)
    }
}

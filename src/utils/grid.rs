//! Simulation grid construction
//!
//! Every effect series lives on a grid of timestamps spaced a whole number
//! of minutes apart, anchored to wall-clock interval boundaries.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Round a timestamp down to a whole multiple of `interval_minutes`
///
/// Seconds and sub-seconds are cleared.
pub fn floor_to_interval(ts: NaiveDateTime, interval_minutes: i64) -> NaiveDateTime {
    let excess_minutes = ts.minute() as i64 % interval_minutes;

    ts - Duration::minutes(excess_minutes)
        - Duration::seconds(ts.second() as i64)
        - Duration::nanoseconds(ts.nanosecond() as i64)
}

/// Round a timestamp up to a whole multiple of `interval_minutes`
///
/// A timestamp already on a boundary is returned unchanged.
pub fn ceil_to_interval(ts: NaiveDateTime, interval_minutes: i64) -> NaiveDateTime {
    let floored = floor_to_interval(ts, interval_minutes);

    if floored == ts {
        ts
    } else {
        floored + Duration::minutes(interval_minutes)
    }
}

/// Generate the simulation grid covering `[start, end]`
///
/// The span is rounded up to a whole minute, then timestamps step by
/// `step_minutes` while strictly below `span + step`. The final point is the
/// smallest step multiple at or past `end` (one step past when the rounded
/// span itself lands on a boundary plus a fraction).
pub fn simulation_timestamps(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step_minutes: i64,
) -> Vec<NaiveDateTime> {
    let span_minutes = ((end - start).num_milliseconds() as f64 / 60_000.0).ceil() as i64;

    let mut timestamps =
        Vec::with_capacity(((span_minutes / step_minutes).max(0) + 2) as usize);
    let mut offset = 0;

    while offset < span_minutes + step_minutes {
        timestamps.push(start + Duration::minutes(offset));
        offset += step_minutes;
    }

    timestamps
}

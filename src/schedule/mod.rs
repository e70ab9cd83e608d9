//! Time-of-day pharmacology schedules
//!
//! Insulin sensitivity and carb ratio vary over the day in bands. A schedule
//! is a piecewise-constant lookup: the entry in effect at a query time is
//! the last one whose start-of-day time is at or before it.

use chrono::NaiveTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One band of a time-of-day schedule
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    /// Start of the band, as a time of day
    pub start: NaiveTime,

    /// Value in effect from `start` until the next entry's start
    #[cfg_attr(feature = "serde", serde(alias = "sensitivity", alias = "ratio"))]
    pub value: f64,
}

impl ScheduleEntry {
    /// Create an entry starting at the given time of day
    pub fn new(start: NaiveTime, value: f64) -> Self {
        Self { start, value }
    }
}

/// A piecewise-constant time-of-day schedule
///
/// Entries are expected in ascending `start` order, as pump settings files
/// store them. No interpolation is performed between bands.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Create a schedule from entries already sorted by start time
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Create a flat schedule with a single value covering the whole day
    pub fn flat(value: f64) -> Self {
        Self {
            entries: vec![ScheduleEntry::new(
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                value,
            )],
        }
    }

    /// The entry in effect at a time of day
    ///
    /// Returns the last entry whose `start` is at or before the query, or
    /// `None` when the first entry starts later than the query (or the
    /// schedule is empty).
    pub fn entry_at(&self, time: NaiveTime) -> Option<&ScheduleEntry> {
        let mut result = None;

        for entry in &self.entries {
            if entry.start > time {
                break;
            }
            result = Some(entry);
        }

        result
    }

    /// The value in effect at a time of day, if any band applies
    pub fn value_at(&self, time: NaiveTime) -> Option<f64> {
        self.entry_at(time).map(|entry| entry.value)
    }

    /// Whether the schedule has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Insulin sensitivity schedule file: `{"sensitivities": [...]}`
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
pub struct SensitivitySchedule {
    pub sensitivities: Vec<ScheduleEntry>,
}

#[cfg(feature = "serde")]
impl From<SensitivitySchedule> for Schedule {
    fn from(file: SensitivitySchedule) -> Self {
        Schedule::new(file.sensitivities)
    }
}

/// Carb ratio schedule file: `{"schedule": [...]}`
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
pub struct CarbRatioSchedule {
    pub schedule: Vec<ScheduleEntry>,
}

#[cfg(feature = "serde")]
impl From<CarbRatioSchedule> for Schedule {
    fn from(file: CarbRatioSchedule) -> Self {
        Schedule::new(file.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tod(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn banded() -> Schedule {
        Schedule::new(vec![
            ScheduleEntry::new(tod(0, 0), 45.0),
            ScheduleEntry::new(tod(6, 0), 50.0),
            ScheduleEntry::new(tod(18, 0), 55.0),
        ])
    }

    #[test]
    fn test_lookup_by_band() {
        let schedule = banded();

        assert_eq!(schedule.value_at(tod(3, 0)), Some(45.0));
        assert_eq!(schedule.value_at(tod(12, 0)), Some(50.0));
        assert_eq!(schedule.value_at(tod(20, 0)), Some(55.0));
    }

    #[test]
    fn test_lookup_on_boundary() {
        let schedule = banded();

        assert_eq!(schedule.value_at(tod(6, 0)), Some(50.0));
        assert_eq!(schedule.value_at(tod(5, 59)), Some(45.0));
    }

    #[test]
    fn test_lookup_before_first_entry() {
        let schedule = Schedule::new(vec![ScheduleEntry::new(tod(6, 0), 50.0)]);

        assert_eq!(schedule.value_at(tod(3, 0)), None);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::default();

        assert!(schedule.is_empty());
        assert_eq!(schedule.value_at(tod(12, 0)), None);
    }

    #[test]
    fn test_flat_schedule() {
        let schedule = Schedule::flat(40.0);

        assert_eq!(schedule.value_at(tod(0, 0)), Some(40.0));
        assert_eq!(schedule.value_at(tod(23, 59)), Some(40.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_sensitivity_file() {
        let file: SensitivitySchedule = serde_json::from_str(
            r#"{
                "sensitivities": [
                    {"start": "00:00:00", "sensitivity": 40.0},
                    {"start": "08:00:00", "sensitivity": 35.0}
                ]
            }"#,
        )
        .unwrap();

        let schedule: Schedule = file.into();
        assert_eq!(schedule.value_at(tod(9, 0)), Some(35.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_carb_ratio_file() {
        let file: CarbRatioSchedule = serde_json::from_str(
            r#"{
                "schedule": [
                    {"start": "00:00:00", "ratio": 10.0},
                    {"start": "06:00:00", "ratio": 9.0}
                ]
            }"#,
        )
        .unwrap();

        let schedule: Schedule = file.into();
        assert_eq!(schedule.value_at(tod(14, 30)), Some(9.0));
    }
}

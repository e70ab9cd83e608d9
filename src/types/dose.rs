//! Dose event types representing insulin deliveries, meals and markers

use chrono::NaiveDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Event category as reported by the pump history normalizer
///
/// The category only gates special handling (the `basal_dosing_end` clamp
/// applies to `TempBasal` alone); effect dispatch is driven by [`DoseUnit`].
/// Unrecognized type strings deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub enum DoseKind {
    Bolus,
    TempBasal,
    Meal,
    Exercise,
    /// Any event type this engine does not recognize
    Unknown,
}

impl From<String> for DoseKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Bolus" => DoseKind::Bolus,
            "TempBasal" => DoseKind::TempBasal,
            "Meal" => DoseKind::Meal,
            "Exercise" => DoseKind::Exercise,
            _ => DoseKind::Unknown,
        }
    }
}

/// Unit of a dose amount
///
/// Effect functions dispatch on the unit: `U` is an instantaneous bolus,
/// `U/hour` a continuous square-wave dose, `g` a meal. `event` and
/// unrecognized units carry no glucose effect and are skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub enum DoseUnit {
    #[cfg_attr(feature = "serde", serde(rename = "U"))]
    Units,

    #[cfg_attr(feature = "serde", serde(rename = "U/hour"))]
    UnitsPerHour,

    #[cfg_attr(feature = "serde", serde(rename = "g"))]
    Grams,

    #[cfg_attr(feature = "serde", serde(rename = "event"))]
    Event,

    Other,
}

impl From<String> for DoseUnit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "U" => DoseUnit::Units,
            "U/hour" => DoseUnit::UnitsPerHour,
            "g" => DoseUnit::Grams,
            "event" => DoseUnit::Event,
            _ => DoseUnit::Other,
        }
    }
}

impl std::fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DoseUnit::Units => "U",
            DoseUnit::UnitsPerHour => "U/hour",
            DoseUnit::Grams => "g",
            DoseUnit::Event => "event",
            DoseUnit::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// A single normalized history event
///
/// Instantaneous events (boluses, meals) have `end_at == start_at`;
/// continuous doses span the interval. `end_at >= start_at` always holds for
/// normalizer output. Negative amounts are permitted and represent cancelled
/// or suspended delivery.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DoseEvent {
    /// Event category
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: DoseKind,

    /// Delivery start
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::time::serde_naive"))]
    pub start_at: NaiveDateTime,

    /// Delivery end
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::time::serde_naive"))]
    pub end_at: NaiveDateTime,

    /// Amount in `unit` (U, U/hour, or g)
    pub amount: f64,

    /// Unit of `amount`, drives effect dispatch
    pub unit: DoseUnit,
}

impl DoseEvent {
    /// Create an instantaneous bolus of `amount` units
    pub fn bolus(amount: f64, at: NaiveDateTime) -> Self {
        Self {
            kind: DoseKind::Bolus,
            start_at: at,
            end_at: at,
            amount,
            unit: DoseUnit::Units,
        }
    }

    /// Create a temp basal running at `rate` U/hour over an interval
    pub fn temp_basal(rate: f64, start_at: NaiveDateTime, end_at: NaiveDateTime) -> Self {
        Self {
            kind: DoseKind::TempBasal,
            start_at,
            end_at,
            amount: rate,
            unit: DoseUnit::UnitsPerHour,
        }
    }

    /// Create a square-wave bolus delivered at `rate` U/hour over an interval
    pub fn square_bolus(rate: f64, start_at: NaiveDateTime, end_at: NaiveDateTime) -> Self {
        Self {
            kind: DoseKind::Bolus,
            start_at,
            end_at,
            amount: rate,
            unit: DoseUnit::UnitsPerHour,
        }
    }

    /// Create a meal entry of `grams` carbohydrates
    pub fn meal(grams: f64, at: NaiveDateTime) -> Self {
        Self {
            kind: DoseKind::Meal,
            start_at: at,
            end_at: at,
            amount: grams,
            unit: DoseUnit::Grams,
        }
    }

    /// Minutes between delivery start and end (0 for instantaneous events)
    pub fn duration_minutes(&self) -> f64 {
        (self.end_at - self.start_at).num_milliseconds() as f64 / 60_000.0
    }
}

/// Earliest start and latest end across a history slice
///
/// Returns `None` for an empty history.
pub(crate) fn dose_time_span(history: &[DoseEvent]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let earliest = history.iter().map(|e| e.start_at).min()?;
    let latest = history.iter().map(|e| e.end_at).max()?;
    Some((earliest, latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 7, 13)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_bolus_constructor() {
        let event = DoseEvent::bolus(1.5, at(12, 0));
        assert_eq!(event.kind, DoseKind::Bolus);
        assert_eq!(event.unit, DoseUnit::Units);
        assert_eq!(event.start_at, event.end_at);
        assert_eq!(event.duration_minutes(), 0.0);
    }

    #[test]
    fn test_temp_basal_duration() {
        let event = DoseEvent::temp_basal(0.8, at(12, 0), at(13, 30));
        assert_eq!(event.kind, DoseKind::TempBasal);
        assert_eq!(event.unit, DoseUnit::UnitsPerHour);
        assert_eq!(event.duration_minutes(), 90.0);
    }

    #[test]
    fn test_time_span() {
        let history = vec![
            DoseEvent::bolus(1.0, at(12, 0)),
            DoseEvent::temp_basal(1.0, at(10, 0), at(11, 0)),
            DoseEvent::meal(20.0, at(12, 30)),
        ];

        let (start, end) = dose_time_span(&history).unwrap();
        assert_eq!(start, at(10, 0));
        assert_eq!(end, at(12, 30));
    }

    #[test]
    fn test_time_span_empty() {
        assert!(dose_time_span(&[]).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_event() {
        let event: DoseEvent = serde_json::from_str(
            r#"{
                "type": "Bolus",
                "start_at": "2015-07-13T12:00:00",
                "end_at": "2015-07-13T12:00:00",
                "amount": 1.0,
                "unit": "U"
            }"#,
        )
        .unwrap();

        assert_eq!(event.kind, DoseKind::Bolus);
        assert_eq!(event.unit, DoseUnit::Units);
        assert_eq!(event.amount, 1.0);
        assert_eq!(event.start_at, at(12, 0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_unknown_type_and_unit() {
        let event: DoseEvent = serde_json::from_str(
            r#"{
                "type": "JournalEntryPumpLowBattery",
                "start_at": "2015-07-13T12:00:00",
                "end_at": "2015-07-13T12:00:00",
                "amount": 0.0,
                "unit": "mV"
            }"#,
        )
        .unwrap();

        assert_eq!(event.kind, DoseKind::Unknown);
        assert_eq!(event.unit, DoseUnit::Other);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_offset_bearing_timestamp() {
        let event: DoseEvent = serde_json::from_str(
            r#"{
                "type": "TempBasal",
                "start_at": "2015-07-13T12:00:00-04:00",
                "end_at": "2015-07-13T13:00:00-04:00",
                "amount": 1.0,
                "unit": "U/hour"
            }"#,
        )
        .unwrap();

        // Offset-bearing timestamps keep their wall-clock reading
        assert_eq!(event.start_at, at(12, 0));
        assert_eq!(event.end_at, at(13, 0));
    }
}

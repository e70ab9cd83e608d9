//! Glucose sample types and raw CGM record ingestion

use chrono::NaiveDateTime;

/// A single glucose value from a CGM or meter
///
/// Streams of samples are reverse-chronological: index 0 is the latest
/// reading. Calibration records share this shape (their value arrives under
/// `meter_glucose`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlucoseSample {
    /// Time of the reading
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::time::serde_naive"))]
    pub date: NaiveDateTime,

    /// Glucose value (mg/dL)
    pub glucose: f64,
}

impl GlucoseSample {
    /// Create a new glucose sample
    pub fn new(date: NaiveDateTime, glucose: f64) -> Self {
        Self { date, glucose }
    }
}

#[cfg(feature = "serde")]
mod ingest {
    use super::GlucoseSample;
    use crate::utils::time;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    /// A timestamp field as found in raw records: an ISO-8601 string or an
    /// epoch-milliseconds number
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        EpochMillis(i64),
    }

    /// Raw CGM/meter record with every field shape seen in the wild
    ///
    /// Uploaders disagree on field names; resolution order is fixed:
    /// timestamp from `dateString`, `display_time`, then `date`; value from
    /// `sgv`, `amount`, `glucose`, then `meter_glucose`. First hit wins.
    #[derive(Deserialize)]
    struct RawGlucoseRecord {
        #[serde(rename = "dateString", default)]
        date_string: Option<String>,
        #[serde(default)]
        display_time: Option<String>,
        #[serde(default)]
        date: Option<RawTimestamp>,
        #[serde(default)]
        sgv: Option<f64>,
        #[serde(default)]
        amount: Option<f64>,
        #[serde(default)]
        glucose: Option<f64>,
        #[serde(default)]
        meter_glucose: Option<f64>,
    }

    impl<'de> Deserialize<'de> for GlucoseSample {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = RawGlucoseRecord::deserialize(deserializer)?;

            let date = if let Some(s) = raw.date_string.as_deref() {
                time::parse_timestamp(s).map_err(D::Error::custom)?
            } else if let Some(s) = raw.display_time.as_deref() {
                time::parse_timestamp(s).map_err(D::Error::custom)?
            } else {
                match raw.date {
                    Some(RawTimestamp::Text(ref s)) => {
                        time::parse_timestamp(s).map_err(D::Error::custom)?
                    }
                    Some(RawTimestamp::EpochMillis(millis)) => {
                        time::from_epoch_millis(millis).map_err(D::Error::custom)?
                    }
                    None => return Err(D::Error::missing_field("date")),
                }
            };

            let glucose = raw
                .sgv
                .or(raw.amount)
                .or(raw.glucose)
                .or(raw.meter_glucose)
                .ok_or_else(|| D::Error::missing_field("sgv"))?;

            Ok(GlucoseSample { date, glucose })
        }
    }
}

//! Effect series point types

use chrono::NaiveDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit of an effect amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EffectUnit {
    /// Glucose impact or predicted glucose
    #[cfg_attr(feature = "serde", serde(rename = "mg/dL"))]
    MilligramsPerDeciliter,

    /// Insulin on board
    #[cfg_attr(feature = "serde", serde(rename = "U"))]
    Units,

    /// Carbs on board
    #[cfg_attr(feature = "serde", serde(rename = "g"))]
    Grams,
}

impl std::fmt::Display for EffectUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EffectUnit::MilligramsPerDeciliter => "mg/dL",
            EffectUnit::Units => "U",
            EffectUnit::Grams => "g",
        };
        write!(f, "{}", label)
    }
}

/// One point of an effect series
///
/// Amounts are cumulative, not instantaneous: the value at a timestamp is
/// the total contribution of all doses up to and including that instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectPoint {
    /// Grid-aligned timestamp
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::time::serde_naive"))]
    pub date: NaiveDateTime,

    /// Cumulative amount in `unit`
    pub amount: f64,

    /// Unit of `amount`
    pub unit: EffectUnit,
}

impl EffectPoint {
    /// Create a new effect point
    pub fn new(date: NaiveDateTime, amount: f64, unit: EffectUnit) -> Self {
        Self { date, amount, unit }
    }
}

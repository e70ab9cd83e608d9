//! Cumulative carb effect and Carbs on Board

use chrono::Duration;
use tracing::debug;

use super::absorption_fraction;
use crate::schedule::Schedule;
use crate::types::dose_time_span;
use crate::types::{DoseEvent, DoseUnit, EffectPoint, EffectUnit};
use crate::utils::grid::{ceil_to_interval, floor_to_interval, simulation_timestamps};
use crate::utils::time::minutes_between;

/// Options for [`calculate_carb_effect`] and [`calculate_cob`]
#[derive(Debug, Clone)]
pub struct CarbEffectOptions {
    /// Grid spacing in minutes
    pub step_minutes: i64,

    /// Minutes between eating and the onset of measurable absorption
    pub absorption_delay: i64,

    /// Total absorption time of a meal, in minutes
    pub absorption_duration: i64,
}

impl Default for CarbEffectOptions {
    fn default() -> Self {
        Self {
            step_minutes: 5,
            absorption_delay: 10,
            absorption_duration: 180,
        }
    }
}

/// Calculate the cumulative glucose impact of meals
///
/// Each grid point carries `sensitivity / ratio * grams * fraction` summed
/// over all meals, where both the sensitivity and the carb ratio are frozen
/// at the meal's start time. Events without a `g` unit are skipped; a meal
/// whose carb ratio lookup finds no band in effect is skipped too.
///
/// Returns an empty series for an empty history.
pub fn calculate_carb_effect(
    history: &[DoseEvent],
    carb_ratios: &Schedule,
    sensitivities: &Schedule,
    options: &CarbEffectOptions,
) -> Vec<EffectPoint> {
    let Some(timestamps) = meal_grid(history, options) else {
        return Vec::new();
    };
    let mut amounts = vec![0.0; timestamps.len()];

    debug!(
        doses = history.len(),
        grid_points = timestamps.len(),
        "calculating carb effect"
    );

    for event in history {
        if event.unit != DoseUnit::Grams {
            continue;
        }

        let Some(ratio) = carb_ratios.value_at(event.start_at.time()) else {
            continue;
        };
        let sensitivity = sensitivities
            .value_at(event.start_at.time())
            .unwrap_or(0.0);

        for (i, &ts) in timestamps.iter().enumerate() {
            let t = minutes_between(ts, event.start_at) - options.absorption_delay as f64;
            amounts[i] += sensitivity / ratio
                * event.amount
                * absorption_fraction(t, options.absorption_duration as f64);
        }
    }

    timestamps
        .into_iter()
        .zip(amounts)
        .map(|(date, amount)| EffectPoint::new(date, amount, EffectUnit::MilligramsPerDeciliter))
        .collect()
}

/// Calculate remaining unabsorbed carbohydrates at each grid point
///
/// COB for a meal is `grams * (1 - fraction)` from the moment the meal
/// starts; it reaches 0 once absorption completes.
///
/// Returns an empty series for an empty history.
pub fn calculate_cob(history: &[DoseEvent], options: &CarbEffectOptions) -> Vec<EffectPoint> {
    let Some(timestamps) = meal_grid(history, options) else {
        return Vec::new();
    };
    let mut amounts = vec![0.0; timestamps.len()];

    for event in history {
        if event.unit != DoseUnit::Grams {
            continue;
        }

        for (i, &ts) in timestamps.iter().enumerate() {
            let t = minutes_between(ts, event.start_at) - options.absorption_delay as f64;
            if t >= -(options.absorption_delay as f64) {
                amounts[i] += event.amount
                    * (1.0 - absorption_fraction(t, options.absorption_duration as f64));
            }
        }
    }

    timestamps
        .into_iter()
        .zip(amounts)
        .map(|(date, amount)| EffectPoint::new(date, amount, EffectUnit::Grams))
        .collect()
}

fn meal_grid(
    history: &[DoseEvent],
    options: &CarbEffectOptions,
) -> Option<Vec<chrono::NaiveDateTime>> {
    let (earliest, latest) = dose_time_span(history)?;

    let tail = Duration::minutes(options.absorption_duration + options.absorption_delay);
    let start = floor_to_interval(earliest, options.step_minutes);
    let end = ceil_to_interval(latest, options.step_minutes) + tail;

    Some(simulation_timestamps(start, end, options.step_minutes))
}

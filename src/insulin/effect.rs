//! Cumulative insulin effect on blood glucose

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use super::{integrate_iob, InsulinActionDuration};
use crate::schedule::Schedule;
use crate::types::dose_time_span;
use crate::types::{DoseEvent, DoseKind, DoseUnit, EffectPoint, EffectUnit};
use crate::utils::grid::{ceil_to_interval, floor_to_interval, simulation_timestamps};
use crate::utils::time::minutes_between;

/// Options for [`calculate_insulin_effect`]
#[derive(Debug, Clone)]
pub struct InsulinEffectOptions {
    /// Grid spacing in minutes
    pub step_minutes: i64,

    /// Minutes between delivery and the onset of measurable effect
    pub absorption_delay: i64,

    /// Truncates TempBasal delivery at this instant when set
    pub basal_dosing_end: Option<NaiveDateTime>,
}

impl Default for InsulinEffectOptions {
    fn default() -> Self {
        Self {
            step_minutes: 5,
            absorption_delay: 10,
            basal_dosing_end: None,
        }
    }
}

/// Calculate the cumulative glucose impact of insulin doses
///
/// Each grid point carries the signed mg/dL impact of all insulin delivered
/// so far: `-amount * sensitivity * (1 - iob_fraction)` for boluses, and the
/// integrated equivalent for square-wave doses. The grid runs from the
/// earliest dose start to the latest dose end plus the full action duration
/// and absorption delay.
///
/// Sensitivity is frozen per dose: at the dose start for boluses, and at
/// `min(end + DIA, now)` for continuous doses, so a completed dose's effect
/// does not drift when the schedule band changes.
///
/// Returns an empty series for an empty history.
pub fn calculate_insulin_effect(
    history: &[DoseEvent],
    dia: InsulinActionDuration,
    sensitivities: &Schedule,
    options: &InsulinEffectOptions,
) -> Vec<EffectPoint> {
    let Some((earliest, latest)) = dose_time_span(history) else {
        return Vec::new();
    };

    let tail = Duration::minutes(dia.minutes() as i64 + options.absorption_delay);
    let start = floor_to_interval(earliest, options.step_minutes);
    let end = ceil_to_interval(latest, options.step_minutes) + tail;

    let timestamps = simulation_timestamps(start, end, options.step_minutes);
    let mut amounts = vec![0.0; timestamps.len()];

    debug!(
        doses = history.len(),
        grid_points = timestamps.len(),
        "calculating insulin effect"
    );

    for event in history {
        match event.unit {
            DoseUnit::Units => {
                let sensitivity = sensitivities
                    .value_at(event.start_at.time())
                    .unwrap_or(0.0);

                for (i, &ts) in timestamps.iter().enumerate() {
                    let t = minutes_between(ts, event.start_at) - options.absorption_delay as f64;
                    amounts[i] += -event.amount * sensitivity * (1.0 - dia.iob_fraction(t));
                }
            }
            DoseUnit::UnitsPerHour => {
                // Freeze the sensitivity lookup once the dose has fully
                // decayed so the series stays constant afterwards
                let action_end = event.end_at + Duration::minutes(dia.minutes() as i64);

                let mut end_at = event.end_at;
                if event.kind == DoseKind::TempBasal {
                    if let Some(dosing_end) = options.basal_dosing_end {
                        end_at = end_at.min(dosing_end);
                    }
                }

                let t1 = minutes_between(end_at, event.start_at);
                if t1 <= 0.0 {
                    continue;
                }

                for (i, &ts) in timestamps.iter().enumerate() {
                    let t = minutes_between(ts, event.start_at) - options.absorption_delay as f64;
                    let sensitivity = sensitivities
                        .value_at(action_end.min(ts).time())
                        .unwrap_or(0.0);

                    let remaining = integrate_iob(0.0, t1, dia, t);
                    amounts[i] += event.amount / 60.0 * -sensitivity * (t1 - remaining);
                }
            }
            DoseUnit::Grams | DoseUnit::Event | DoseUnit::Other => {}
        }
    }

    timestamps
        .into_iter()
        .zip(amounts)
        .map(|(date, amount)| EffectPoint::new(date, amount, EffectUnit::MilligramsPerDeciliter))
        .collect()
}

//! Insulin on Board (IOB) calculations
//!
//! This module calculates residual active insulin across all doses on a
//! minute grid, using the Walsh decay curve for boluses and a discrete
//! slice summation for square-wave doses.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::insulin::{sum_iob, InsulinActionDuration};
use crate::types::dose_time_span;
use crate::types::{DoseEvent, DoseKind, DoseUnit, EffectPoint, EffectUnit};
use crate::utils::grid::{ceil_to_interval, floor_to_interval, simulation_timestamps};
use crate::utils::time::minutes_between;

/// Options for [`calculate_iob`]
#[derive(Debug, Clone)]
pub struct IobOptions {
    /// Grid spacing in minutes
    pub step_minutes: i64,

    /// Minutes between delivery and the onset of measurable effect
    pub absorption_delay: i64,

    /// Truncates TempBasal delivery at this instant when set
    pub basal_dosing_end: Option<NaiveDateTime>,

    /// Overrides the auto-computed grid start
    pub start_at: Option<NaiveDateTime>,

    /// Overrides the auto-computed grid end
    pub end_at: Option<NaiveDateTime>,

    /// Show a dose's IOB from its delivery instant rather than after the
    /// absorption delay. On-pump displays want the former; effect math the
    /// latter.
    pub visual_iob_only: bool,
}

impl Default for IobOptions {
    fn default() -> Self {
        Self {
            step_minutes: 5,
            absorption_delay: 10,
            basal_dosing_end: None,
            start_at: None,
            end_at: None,
            visual_iob_only: true,
        }
    }
}

/// Calculate residual insulin from all doses at each grid point
///
/// The grid spans from the earliest dose start (floored to the step) to the
/// latest dose end (ceiled) plus the full action duration and absorption
/// delay, unless overridden. Amounts are in units of insulin; the final
/// grid point of an auto-computed span is always 0.
///
/// Returns an empty series for an empty history.
pub fn calculate_iob(
    history: &[DoseEvent],
    dia: InsulinActionDuration,
    options: &IobOptions,
) -> Vec<EffectPoint> {
    let Some((earliest, latest)) = dose_time_span(history) else {
        return Vec::new();
    };

    let tail = Duration::minutes(dia.minutes() as i64 + options.absorption_delay);
    let start = options
        .start_at
        .unwrap_or_else(|| floor_to_interval(earliest, options.step_minutes));
    let end = options
        .end_at
        .unwrap_or_else(|| ceil_to_interval(latest, options.step_minutes) + tail);

    let timestamps = simulation_timestamps(start, end, options.step_minutes);
    let mut amounts = vec![0.0; timestamps.len()];

    debug!(
        doses = history.len(),
        grid_points = timestamps.len(),
        visual_iob_only = options.visual_iob_only,
        "calculating insulin on board"
    );

    let delay = options.absorption_delay as f64;

    for event in history {
        match event.unit {
            DoseUnit::Units => {
                for (i, &ts) in timestamps.iter().enumerate() {
                    let t = minutes_between(ts, event.start_at) - delay;
                    if t < -delay {
                        continue;
                    }

                    if options.visual_iob_only || t >= 0.0 {
                        amounts[i] += event.amount * dia.iob_fraction(t);
                    }
                }
            }
            DoseUnit::UnitsPerHour => {
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

                let sum_delay = if options.visual_iob_only { delay } else { 0.0 };

                for (i, &ts) in timestamps.iter().enumerate() {
                    let t = minutes_between(ts, event.start_at) - delay;
                    if t < -delay {
                        continue;
                    }

                    let step = options.step_minutes as f64;
                    amounts[i] +=
                        event.amount * (t1 / 60.0) * sum_iob(0.0, t1, dia, t, step, sum_delay);
                }
            }
            DoseUnit::Grams | DoseUnit::Event | DoseUnit::Other => {}
        }
    }

    timestamps
        .into_iter()
        .zip(amounts)
        .map(|(date, amount)| EffectPoint::new(date, amount, EffectUnit::Units))
        .collect()
}

//! Glucose trajectory composition
//!
//! Effect streams are cumulative curves; composing them means summing their
//! per-step deltas onto the last observed glucose value. Momentum, when
//! present, takes over the early part of the horizon and hands off linearly
//! to the dose-driven effects.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::carbs::{calculate_carb_effect, CarbEffectOptions};
use crate::insulin::{calculate_insulin_effect, InsulinActionDuration, InsulinEffectOptions};
use crate::schedule::Schedule;
use crate::types::{DoseEvent, EffectPoint, EffectUnit, GlucoseSample};

/// Compose cumulative effect series into a predicted glucose trajectory
///
/// The output starts with the latest CGM sample verbatim and walks forward
/// through the union of all effect timestamps, adding each step's summed
/// deltas to the running value. A momentum series with more than two points
/// replaces the early deltas, blending out linearly over its horizon.
///
/// Returns an empty series when there is no CGM sample to anchor on.
pub fn calculate_glucose_from_effects(
    effects: &[Vec<EffectPoint>],
    recent_glucose: &[GlucoseSample],
    momentum: Option<&[EffectPoint]>,
) -> Vec<EffectPoint> {
    let Some(anchor) = recent_glucose.first() else {
        return Vec::new();
    };

    // Union of per-step deltas across all series, keyed by timestamp
    let mut deltas: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();

    for series in effects {
        let mut previous = 0.0;
        for point in series {
            *deltas.entry(point.date).or_insert(0.0) += point.amount - previous;
            previous = point.amount;
        }
    }

    if let Some(momentum) = momentum {
        // A two-point momentum series has no horizon to blend over
        if momentum.len() > 2 {
            blend_momentum(&mut deltas, momentum, anchor);
        }
    }

    debug!(
        series = effects.len(),
        grid_points = deltas.len(),
        "composing glucose trajectory"
    );

    let mut predicted = Vec::with_capacity(deltas.len() + 1);
    predicted.push(EffectPoint::new(
        anchor.date,
        anchor.glucose,
        EffectUnit::MilligramsPerDeciliter,
    ));

    let mut value = anchor.glucose;
    for (date, delta) in deltas {
        if date > anchor.date {
            value += delta;
            predicted.push(EffectPoint::new(
                date,
                value,
                EffectUnit::MilligramsPerDeciliter,
            ));
        }
    }

    predicted
}

/// Replace early deltas with momentum deltas, fading linearly to zero at
/// the end of the momentum horizon
///
/// The split weight for entry `i` of `n` is
/// `(n - (i+1)) / (n - 2) + offset / (n - 2)`, clamped to [0, 1], where
/// `offset` is the anchor's fractional position inside the first momentum
/// step. The weight is ~1 just past the anchor and reaches 0 at the
/// horizon.
fn blend_momentum(
    deltas: &mut BTreeMap<NaiveDateTime, f64>,
    momentum: &[EffectPoint],
    anchor: &GlucoseSample,
) {
    let count = momentum.len() as f64;

    let step_seconds = (momentum[1].date - momentum[0].date).num_seconds() as f64;
    let offset = (anchor.date - momentum[0].date).num_seconds() as f64 / step_seconds;
    let blend_offset = offset / (count - 2.0);

    let mut previous = 0.0;
    for (i, point) in momentum.iter().enumerate() {
        let delta = point.amount - previous;
        previous = point.amount;

        let split = ((count - (i as f64 + 1.0)) / (count - 2.0) + blend_offset).clamp(0.0, 1.0);
        let existing = deltas.get(&point.date).copied().unwrap_or(0.0);
        deltas.insert(point.date, split * delta + (1.0 - split) * existing);
    }
}

/// Predict glucose from insulin and carb effects
///
/// Convenience wrapper building both effect series with shared grid
/// settings and composing them without momentum.
pub fn future_glucose(
    history: &[DoseEvent],
    recent_glucose: &[GlucoseSample],
    dia: InsulinActionDuration,
    sensitivities: &Schedule,
    carb_ratios: &Schedule,
    basal_dosing_end: Option<NaiveDateTime>,
) -> Vec<EffectPoint> {
    let insulin_effect = calculate_insulin_effect(
        history,
        dia,
        sensitivities,
        &InsulinEffectOptions {
            basal_dosing_end,
            ..Default::default()
        },
    );

    let carb_effect = calculate_carb_effect(
        history,
        carb_ratios,
        sensitivities,
        &CarbEffectOptions::default(),
    );

    calculate_glucose_from_effects(&[insulin_effect, carb_effect], recent_glucose, None)
}

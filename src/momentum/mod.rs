//! Short-horizon glucose momentum
//!
//! Fits a line through the latest few CGM samples and extrapolates it
//! forward a few minutes. The fit is vetoed when the samples are too spread
//! out to represent a coherent trend, or when a recent meter calibration
//! may have stepped the trace.

use chrono::Duration;
use tracing::debug;

use crate::types::{EffectPoint, EffectUnit, GlucoseSample};
use crate::utils::grid::{floor_to_interval, simulation_timestamps};

/// Options for [`calculate_momentum_effect`]
#[derive(Debug, Clone)]
pub struct MomentumOptions {
    /// Grid spacing in minutes
    pub step_minutes: i64,

    /// Total length of forward extrapolation in minutes
    pub prediction_time: i64,

    /// Number of recent samples in the regression window
    pub fit_points: usize,
}

impl Default for MomentumOptions {
    fn default() -> Self {
        Self {
            step_minutes: 5,
            prediction_time: 30,
            fit_points: 3,
        }
    }
}

/// Extrapolate the short-term glucose trend from recent CGM samples
///
/// `recent_glucose` and `recent_calibrations` are reverse-chronological.
/// The regression runs over the latest `fit_points` samples against seconds
/// since the latest sample; the slope is carried forward as a cumulative
/// mg/dL effect over `prediction_time`, starting at 0 on the grid point at
/// or before the latest sample.
///
/// Degenerate conditions return an empty series: fewer than `fit_points`
/// samples, a window wider than `step_minutes * fit_points`, duplicate
/// sample timestamps, or a calibration within `step_minutes * fit_points`
/// of the latest sample.
pub fn calculate_momentum_effect(
    recent_glucose: &[GlucoseSample],
    recent_calibrations: &[GlucoseSample],
    options: &MomentumOptions,
) -> Vec<EffectPoint> {
    if options.fit_points < 2 || recent_glucose.len() < options.fit_points {
        debug!(
            samples = recent_glucose.len(),
            required = options.fit_points,
            "momentum vetoed: not enough samples"
        );
        return Vec::new();
    }

    let window = &recent_glucose[..options.fit_points];
    let latest = &window[0];

    // Seconds relative to the latest sample: 0 for the latest, negative
    // for the older ones
    let offsets: Vec<f64> = window
        .iter()
        .map(|sample| (sample.date - latest.date).num_milliseconds() as f64 / 1000.0)
        .collect();

    let window_limit = (options.step_minutes * options.fit_points as i64 * 60) as f64;

    let span = (offsets[0] - offsets[offsets.len() - 1]).abs();
    if span > window_limit {
        debug!(span_seconds = span, "momentum vetoed: samples too spread out");
        return Vec::new();
    }

    for calibration in recent_calibrations {
        let distance = (latest.date - calibration.date).num_seconds().abs() as f64;
        if distance <= window_limit {
            debug!(
                distance_seconds = distance,
                "momentum vetoed: recent calibration"
            );
            return Vec::new();
        }
    }

    let Some(slope) = regression_slope(&offsets, window) else {
        debug!("momentum vetoed: degenerate sample spacing");
        return Vec::new();
    };

    let start = floor_to_interval(latest.date, options.step_minutes);
    let end = start + Duration::minutes(options.prediction_time);

    simulation_timestamps(start, end, options.step_minutes)
        .into_iter()
        .map(|date| {
            let seconds_ahead = (date - latest.date).num_seconds().max(0) as f64;
            EffectPoint::new(
                date,
                seconds_ahead * slope,
                EffectUnit::MilligramsPerDeciliter,
            )
        })
        .collect()
}

/// Least-squares slope of glucose against seconds, or `None` when the
/// sample times carry no variance
fn regression_slope(offsets: &[f64], window: &[GlucoseSample]) -> Option<f64> {
    let n = offsets.len() as f64;
    let mean_x = offsets.iter().sum::<f64>() / n;
    let mean_y = window.iter().map(|s| s.glucose).sum::<f64>() / n;

    let covariance: f64 = offsets
        .iter()
        .zip(window)
        .map(|(x, sample)| (x - mean_x) * (sample.glucose - mean_y))
        .sum();
    let variance: f64 = offsets.iter().map(|x| (x - mean_x) * (x - mean_x)).sum();

    if variance == 0.0 {
        None
    } else {
        Some(covariance / variance)
    }
}

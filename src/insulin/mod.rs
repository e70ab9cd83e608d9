//! Insulin pharmacokinetics
//!
//! The Walsh decay curve gives the fraction of a dose still active a given
//! number of minutes after delivery. Square-wave doses are handled by
//! integrating the curve over the delivery interval.

mod curve;
mod effect;
mod integrate;

pub use curve::InsulinActionDuration;
pub use effect::{calculate_insulin_effect, InsulinEffectOptions};
pub use integrate::{integrate_iob, sum_iob};

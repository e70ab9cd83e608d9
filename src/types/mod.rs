//! Core data types for the forecast engine

mod dose;
mod effect;
mod glucose;

pub use dose::{DoseEvent, DoseKind, DoseUnit};
pub use effect::{EffectPoint, EffectUnit};
pub use glucose::GlucoseSample;

pub(crate) use dose::dose_time_span;

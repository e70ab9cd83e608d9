//! # glucast - blood glucose forecasting
//!
//! This crate predicts near-future blood glucose for a closed-loop insulin
//! delivery controller. Given a patient's recent dosing history, a stream of
//! continuous glucose monitor (CGM) samples, and time-banded pharmacology
//! schedules, it produces a dense time series of predicted glucose values
//! extending past the last observation until the last physiological effect
//! decays.
//!
//! ## Pipelines
//!
//! - **IOB**: residual active insulin from boluses and square-wave doses,
//!   using the Walsh decay curve
//! - **Insulin effect**: cumulative mg/dL impact of insulin doses
//! - **Carb effect / COB**: cumulative mg/dL impact and remaining grams of
//!   meals, using the Scheiner absorption curve
//! - **Momentum**: short-horizon trend extrapolation from recent CGM samples
//! - **Composition**: blending effect streams and momentum into a predicted
//!   glucose trajectory anchored at the last CGM sample
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glucast::prelude::*;
//!
//! let dia = InsulinActionDuration::from_hours(4)?;
//! let glucose = future_glucose(
//!     &history,
//!     &recent_glucose,
//!     dia,
//!     &sensitivities,
//!     &carb_ratios,
//!     None,
//! );
//! ```
//!
//! All pipelines are pure and deterministic: identical inputs produce
//! bit-identical outputs. Recoverable conditions (empty history, unknown
//! units, degenerate momentum) yield empty outputs rather than errors.
//!
//! ## Feature flags
//!
//! - `serde` (default): JSON serialization/deserialization of the ingest and
//!   output types

pub mod types;
pub mod schedule;
pub mod insulin;
pub mod iob;
pub mod carbs;
pub mod momentum;
pub mod predict;
pub mod utils;
pub mod error;

/// Re-exports of commonly used types and functions
pub mod prelude {
    pub use crate::types::*;
    pub use crate::schedule::{Schedule, ScheduleEntry};
    pub use crate::insulin::{calculate_insulin_effect, InsulinActionDuration, InsulinEffectOptions};
    pub use crate::iob::{calculate_iob, IobOptions};
    pub use crate::carbs::{calculate_carb_effect, calculate_cob, CarbEffectOptions};
    pub use crate::momentum::{calculate_momentum_effect, MomentumOptions};
    pub use crate::predict::{calculate_glucose_from_effects, future_glucose};
    pub use crate::error::PredictError;
}

pub use error::PredictError;
pub type Result<T> = std::result::Result<T, PredictError>;

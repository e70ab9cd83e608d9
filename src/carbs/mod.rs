//! Carbohydrate absorption and its glucose effect
//!
//! Meals raise glucose as their carbohydrates absorb. Absorption follows
//! the Scheiner GI curve; the remaining unabsorbed grams are Carbs on
//! Board (COB).

mod curve;
mod effect;

pub use curve::absorption_fraction;
pub use effect::{calculate_carb_effect, calculate_cob, CarbEffectOptions};

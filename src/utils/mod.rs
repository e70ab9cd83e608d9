//! Time and grid utility functions

pub mod grid;
pub mod time;

pub use grid::{ceil_to_interval, floor_to_interval, simulation_timestamps};
pub use time::{from_epoch_millis, minutes_between, parse_timestamp};

//! Error types

use thiserror::Error;

/// Errors surfaced by the forecast engine
///
/// Only contract violations are errors. Recoverable conditions (empty
/// history, unknown units, degenerate momentum) produce empty outputs
/// instead.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The Walsh curve family only covers whole-hour action durations
    /// between 3 and 6 hours.
    #[error("insulin action duration must be 3-6 whole hours, got {0}")]
    UnsupportedActionDuration(u8),

    /// A timestamp string could not be parsed in any recognized format.
    #[error("unrecognized timestamp: {0}")]
    InvalidTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PredictError::UnsupportedActionDuration(7);
        assert!(err.to_string().contains("3-6"));

        let err = PredictError::InvalidTimestamp("not-a-date".to_string());
        assert!(err.to_string().contains("not-a-date"));
    }
}

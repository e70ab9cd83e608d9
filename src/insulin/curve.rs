//! Walsh insulin action curves
//!
//! The Walsh model describes insulin-on-board decay with a closed-form
//! quartic polynomial per duration of insulin action (DIA). Coefficients
//! exist for whole-hour durations from 3 to 6 hours only; the constructor
//! refuses anything else. The curve first appeared in GlucoDyn.

use crate::{PredictError, Result};

/// Quartic coefficients in descending degree order: [c4, c3, c2, c1, c0]
type Coefficients = [f64; 5];

const WALSH_3_HOUR: Coefficients = [-3.2030e-9, 1.354e-6, -1.759e-4, 9.255e-4, 0.99951];
const WALSH_4_HOUR: Coefficients = [-3.310e-10, 2.530e-7, -5.510e-5, -9.086e-4, 0.99950];
const WALSH_5_HOUR: Coefficients = [-2.950e-10, 2.320e-7, -5.550e-5, 4.490e-4, 0.99300];
const WALSH_6_HOUR: Coefficients = [-1.493e-10, 1.413e-7, -4.095e-5, 6.365e-4, 0.99700];

/// Duration of insulin action with its Walsh decay curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsulinActionDuration {
    ThreeHours,
    FourHours,
    FiveHours,
    SixHours,
}

impl InsulinActionDuration {
    /// Construct from a whole-hour duration
    ///
    /// Values outside 3-6 hours are a contract violation: no Walsh
    /// coefficients exist for them.
    pub fn from_hours(hours: u8) -> Result<Self> {
        match hours {
            3 => Ok(InsulinActionDuration::ThreeHours),
            4 => Ok(InsulinActionDuration::FourHours),
            5 => Ok(InsulinActionDuration::FiveHours),
            6 => Ok(InsulinActionDuration::SixHours),
            other => Err(PredictError::UnsupportedActionDuration(other)),
        }
    }

    /// Duration in hours
    pub fn hours(&self) -> u8 {
        match self {
            InsulinActionDuration::ThreeHours => 3,
            InsulinActionDuration::FourHours => 4,
            InsulinActionDuration::FiveHours => 5,
            InsulinActionDuration::SixHours => 6,
        }
    }

    /// Duration in minutes
    pub fn minutes(&self) -> f64 {
        self.hours() as f64 * 60.0
    }

    fn coefficients(&self) -> &'static Coefficients {
        match self {
            InsulinActionDuration::ThreeHours => &WALSH_3_HOUR,
            InsulinActionDuration::FourHours => &WALSH_4_HOUR,
            InsulinActionDuration::FiveHours => &WALSH_5_HOUR,
            InsulinActionDuration::SixHours => &WALSH_6_HOUR,
        }
    }

    /// Fraction of a dose remaining `minutes_since_delivery` after it began
    ///
    /// 1 at or before delivery, 0 at or past the full duration, and the
    /// Walsh quartic in between.
    pub fn iob_fraction(&self, minutes_since_delivery: f64) -> f64 {
        let t = minutes_since_delivery;

        if t >= self.minutes() {
            return 0.0;
        }
        if t <= 0.0 {
            return 1.0;
        }

        let [c4, c3, c2, c1, c0] = *self.coefficients();
        c4 * t.powi(4) + c3 * t.powi(3) + c2 * t.powi(2) + c1 * t + c0
    }
}

impl std::fmt::Display for InsulinActionDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

impl std::str::FromStr for InsulinActionDuration {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_end_matches('h').parse::<u8>() {
            Ok(hours) => Self::from_hours(hours),
            Err(_) => Err(PredictError::UnsupportedActionDuration(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_out_of_range_durations() {
        assert!(InsulinActionDuration::from_hours(2).is_err());
        assert!(InsulinActionDuration::from_hours(7).is_err());
        assert!(InsulinActionDuration::from_hours(0).is_err());
    }

    #[test]
    fn test_accepts_supported_durations() {
        for hours in 3..=6 {
            let dia = InsulinActionDuration::from_hours(hours).unwrap();
            assert_eq!(dia.hours(), hours);
            assert_eq!(dia.minutes(), hours as f64 * 60.0);
        }
    }

    #[test]
    fn test_fraction_at_boundaries() {
        for hours in 3..=6 {
            let dia = InsulinActionDuration::from_hours(hours).unwrap();

            assert_eq!(dia.iob_fraction(0.0), 1.0);
            assert_eq!(dia.iob_fraction(-10.0), 1.0);
            assert_eq!(dia.iob_fraction(dia.minutes()), 0.0);
            assert_eq!(dia.iob_fraction(dia.minutes() + 60.0), 0.0);
        }
    }

    #[test]
    fn test_quartic_value_four_hours() {
        let dia = InsulinActionDuration::from_hours(4).unwrap();

        // -3.310e-10*120^4 + 2.530e-7*120^3 - 5.510e-5*120^2
        //   - 9.086e-4*120 + 0.99950
        assert_relative_eq!(dia.iob_fraction(120.0), 0.46557584, epsilon = 1e-9);
    }

    #[test]
    fn test_quartic_value_three_hours() {
        let dia = InsulinActionDuration::from_hours(3).unwrap();

        // -3.2030e-9*90^4 + 1.354e-6*90^3 - 1.759e-4*90^2
        //   + 9.255e-4*90 + 0.99951
        assert_relative_eq!(dia.iob_fraction(90.0), 0.43493217, epsilon = 1e-7);
    }

    #[test]
    fn test_fraction_decreases_over_action_window() {
        let dia = InsulinActionDuration::from_hours(4).unwrap();

        let mut previous = dia.iob_fraction(1.0);
        for minutes in (10..240).step_by(10) {
            let current = dia.iob_fraction(minutes as f64);
            assert!(
                current < previous,
                "fraction should fall from {} at {} min, got {}",
                previous,
                minutes,
                current
            );
            previous = current;
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "4h".parse::<InsulinActionDuration>().unwrap(),
            InsulinActionDuration::FourHours
        );
        assert_eq!(
            "5".parse::<InsulinActionDuration>().unwrap(),
            InsulinActionDuration::FiveHours
        );
        assert!("90m".parse::<InsulinActionDuration>().is_err());
    }
}

//! Property-based invariants of the effect pipelines

use approx::relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;

use glucast::prelude::*;

fn base_time(minute_offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 7, 13)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
        + Duration::minutes(minute_offset)
}

fn dia() -> InsulinActionDuration {
    InsulinActionDuration::from_hours(4).unwrap()
}

fn bolus_history() -> impl Strategy<Value = Vec<DoseEvent>> {
    prop::collection::vec((0i64..600, 1u32..100), 1..6).prop_map(|doses| {
        doses
            .into_iter()
            .map(|(offset, tenths)| DoseEvent::bolus(tenths as f64 / 10.0, base_time(offset)))
            .collect()
    })
}

proptest! {
    #[test]
    fn grid_is_aligned_and_evenly_spaced(history in bolus_history()) {
        let iob = calculate_iob(&history, dia(), &IobOptions::default());

        for point in &iob {
            prop_assert_eq!(point.date.minute() % 5, 0);
            prop_assert_eq!(point.date.second(), 0);
        }
        for pair in iob.windows(2) {
            prop_assert_eq!((pair[1].date - pair[0].date).num_minutes(), 5);
        }
    }

    #[test]
    fn iob_is_nonnegative_and_decays(history in bolus_history()) {
        let iob = calculate_iob(&history, dia(), &IobOptions::default());

        prop_assert!(!iob.is_empty());
        for point in &iob {
            prop_assert!(point.amount >= 0.0);
        }
        prop_assert_eq!(iob.last().unwrap().amount, 0.0);
    }

    #[test]
    fn insulin_effect_scales_linearly(
        history in bolus_history(),
        numerator in 1u32..40,
    ) {
        let alpha = numerator as f64 / 8.0;
        let schedule = Schedule::flat(40.0);

        let base = calculate_insulin_effect(
            &history, dia(), &schedule, &InsulinEffectOptions::default());

        let scaled_history: Vec<DoseEvent> = history
            .iter()
            .map(|e| DoseEvent { amount: e.amount * alpha, ..e.clone() })
            .collect();
        let scaled = calculate_insulin_effect(
            &scaled_history, dia(), &schedule, &InsulinEffectOptions::default());

        prop_assert_eq!(base.len(), scaled.len());
        for (b, s) in base.iter().zip(&scaled) {
            prop_assert!(
                relative_eq!(b.amount * alpha, s.amount, max_relative = 1e-9, epsilon = 1e-9),
                "scaling mismatch: {} * {} vs {}", b.amount, alpha, s.amount
            );
        }
    }

    #[test]
    fn bolus_effect_is_nonincreasing(history in bolus_history()) {
        let effect = calculate_insulin_effect(
            &history, dia(), &Schedule::flat(40.0), &InsulinEffectOptions::default());

        for pair in effect.windows(2) {
            prop_assert!(pair[1].amount <= pair[0].amount + 1e-9);
        }
    }

    #[test]
    fn insulin_effect_tail_is_dose_times_sensitivity(
        offset in 0i64..600,
        tenths in 1u32..100,
    ) {
        let amount = tenths as f64 / 10.0;
        let history = vec![DoseEvent::bolus(amount, base_time(offset))];
        let effect = calculate_insulin_effect(
            &history, dia(), &Schedule::flat(40.0), &InsulinEffectOptions::default());

        let last = effect.last().unwrap();
        prop_assert!(
            relative_eq!(last.amount, -amount * 40.0, max_relative = 1e-9),
            "tail {} for amount {}", last.amount, amount
        );
    }

    #[test]
    fn cob_conserves_and_empties(
        offset in 0i64..600,
        grams in 1u32..120,
    ) {
        let history = vec![DoseEvent::meal(grams as f64, base_time(offset))];
        let cob = calculate_cob(&history, &CarbEffectOptions::default());

        prop_assert!(!cob.is_empty());
        // Full at the meal, gone at the end of absorption
        let peak = cob.iter().map(|p| p.amount).fold(0.0, f64::max);
        prop_assert!(relative_eq!(peak, grams as f64, max_relative = 1e-9));
        prop_assert_eq!(cob.last().unwrap().amount, 0.0);
    }

    #[test]
    fn carb_effect_matches_cob_depletion(
        offset in 0i64..600,
        grams in 1u32..120,
    ) {
        let history = vec![DoseEvent::meal(grams as f64, base_time(offset))];
        let options = CarbEffectOptions::default();

        let effect = calculate_carb_effect(
            &history, &Schedule::flat(10.0), &Schedule::flat(40.0), &options);
        let cob = calculate_cob(&history, &options);

        // From the meal onward, the absorbed fraction implied by the
        // effect equals the fraction missing from COB
        for (e, c) in effect.iter().zip(&cob) {
            if e.date < history[0].start_at {
                continue;
            }
            let absorbed_by_effect = e.amount / (40.0 / 10.0);
            let absorbed_by_cob = grams as f64 - c.amount;
            prop_assert!(
                relative_eq!(absorbed_by_effect, absorbed_by_cob,
                    max_relative = 1e-9, epsilon = 1e-9),
                "effect implies {} absorbed, cob implies {}",
                absorbed_by_effect, absorbed_by_cob
            );
        }
    }

    #[test]
    fn composition_anchors_on_latest_sample(
        history in bolus_history(),
        value in 40u32..400,
    ) {
        let glucose = vec![GlucoseSample::new(base_time(0), value as f64)];
        let predicted = future_glucose(
            &history, &glucose, dia(), &Schedule::flat(40.0), &Schedule::flat(10.0), None);

        prop_assert_eq!(predicted[0].date, base_time(0));
        prop_assert_eq!(predicted[0].amount, value as f64);
        for pair in predicted.windows(2) {
            prop_assert!(pair[1].date > pair[0].date);
        }
    }

    #[test]
    fn momentum_vetoed_by_nearby_calibration(
        minutes_before in 0i64..15,
        value in 40u32..400,
    ) {
        let glucose = vec![
            GlucoseSample::new(base_time(10), value as f64),
            GlucoseSample::new(base_time(5), value as f64 - 3.0),
            GlucoseSample::new(base_time(0), value as f64 - 6.0),
        ];
        let calibrations = vec![GlucoseSample::new(
            base_time(10 - minutes_before),
            value as f64,
        )];

        let momentum = calculate_momentum_effect(
            &glucose, &calibrations, &MomentumOptions::default());
        prop_assert!(momentum.is_empty());
    }
}

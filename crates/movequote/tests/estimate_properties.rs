//! Property checks for the estimate tables: every answer combination yields a
//! sane range, and junk pricing ignores move-only answers.

use proptest::prelude::*;

use movequote::workflows::quote::{
    compute_estimate, DistanceBand, ElevatorAccess, EstimatePolicy, HomeSize, IntakeRecord,
    JobType, JunkWeight, PriceBand, StairAccess,
};

fn job_type_strategy() -> impl Strategy<Value = JobType> {
    prop_oneof![
        Just(JobType::Residential),
        Just(JobType::Commercial),
        Just(JobType::Junk),
    ]
}

fn stairs_strategy() -> impl Strategy<Value = StairAccess> {
    prop_oneof![
        Just(StairAccess::None),
        Just(StairAccess::Some),
        Just(StairAccess::Heavy),
    ]
}

fn elevator_strategy() -> impl Strategy<Value = ElevatorAccess> {
    prop_oneof![
        Just(ElevatorAccess::Yes),
        Just(ElevatorAccess::No),
        Just(ElevatorAccess::Unsure),
    ]
}

prop_compose! {
    fn intake_strategy()(
        job_type in job_type_strategy(),
        size in proptest::option::of(proptest::sample::select(HomeSize::ordered().to_vec())),
        distance in proptest::option::of(proptest::sample::select(DistanceBand::ordered().to_vec())),
        junk_weight in proptest::option::of(proptest::sample::select(JunkWeight::ordered().to_vec())),
        stairs in stairs_strategy(),
        has_elevator in elevator_strategy(),
        sqft in "[0-9]{0,5}",
    ) -> IntakeRecord {
        IntakeRecord {
            job_type,
            size,
            distance,
            junk_weight,
            stairs,
            has_elevator,
            sqft,
            ..IntakeRecord::default()
        }
    }
}

proptest! {
    /// The range is never inverted, whatever was answered.
    #[test]
    fn high_never_below_low(record in intake_strategy()) {
        let estimate = compute_estimate(&record);
        prop_assert!(estimate.high >= estimate.low);
        prop_assert!(estimate.low > 0);
    }

    /// Junk pricing depends only on the weight band.
    #[test]
    fn junk_ignores_move_answers(record in intake_strategy()) {
        let junk = IntakeRecord {
            job_type: JobType::Junk,
            ..record.clone()
        };
        let bare = IntakeRecord {
            job_type: JobType::Junk,
            junk_weight: record.junk_weight,
            ..IntakeRecord::default()
        };
        prop_assert_eq!(compute_estimate(&junk), compute_estimate(&bare));
    }

    /// Banded move estimates stay on the configured grid and inside the band.
    #[test]
    fn banded_moves_stay_inside_band(record in intake_strategy()) {
        let band = PriceBand::STANDARD;
        let estimate = EstimatePolicy::Banded(band).estimate(&record);
        if record.job_type == JobType::Junk {
            prop_assert_eq!(estimate, compute_estimate(&record));
        } else {
            prop_assert!(estimate.low >= band.floor && estimate.high <= band.ceiling);
            prop_assert_eq!(estimate.low % band.step, 0);
            prop_assert_eq!(estimate.high % band.step, 0);
            prop_assert!(estimate.high >= estimate.low);
        }
    }

    /// Baseline policy is the plain table lookup.
    #[test]
    fn baseline_policy_matches_tables(record in intake_strategy()) {
        prop_assert_eq!(EstimatePolicy::Baseline.estimate(&record), compute_estimate(&record));
    }
}

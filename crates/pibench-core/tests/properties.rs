//! Property-based tests for the series evaluator and scoring.

use proptest::prelude::*;

use pibench_core::decimal::Precision;
use pibench_core::progress::AbortToken;
use pibench_core::score::score_from_secs;
use pibench_core::series::{combine, evaluate_range, PartialSum};

fn partial(precision: &Precision, start: u64, end: u64) -> PartialSum {
    evaluate_range(precision, start..end, &AbortToken::new()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Splitting [0, n) at any point moves the total by at most one ulp per term.
    #[test]
    fn split_point_does_not_change_sum(n in 1u64..40, cut in 0u64..40) {
        let cut = cut.min(n);
        let precision = Precision::new(600);
        let full = partial(&precision, 0, n);
        let parts = [partial(&precision, 0, cut), partial(&precision, cut, n)];
        let combined = combine(&precision, &parts).unwrap();
        prop_assert!(combined.ulps_from(&full.sum) <= n);
    }

    /// Three-way splits stay within the same bound.
    #[test]
    fn three_way_split(a in 0u64..15, b in 0u64..15, c in 1u64..15) {
        let precision = Precision::new(700);
        let (x, y, z) = (a, a + b, a + b + c);
        let full = partial(&precision, 0, z);
        let parts = [
            partial(&precision, 0, x),
            partial(&precision, x, y),
            partial(&precision, y, z),
        ];
        let combined = combine(&precision, &parts).unwrap();
        prop_assert!(combined.ulps_from(&full.sum) <= z);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Scores are positive and never increase with the elapsed time.
    #[test]
    fn score_is_positive_and_non_increasing(a in 0.0f64..1e6, b in 0.0f64..1e6) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(score_from_secs(long) >= 1);
        prop_assert!(score_from_secs(short) >= score_from_secs(long));
        prop_assert!(score_from_secs(short) <= 10_000);
    }
}

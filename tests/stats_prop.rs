//! Property tests for the descriptive statistics.

use proptest::prelude::*;
use renaflow::stats::{minutes_to_hours, quartiles};

proptest! {
    /// Converting minutes to hours and then taking quantiles must agree
    /// with taking quantiles first and converting the result: linear unit
    /// conversion commutes with order statistics.
    #[test]
    fn unit_conversion_commutes_with_quartiles(
        minutes in prop::collection::vec(0.0f64..100_000.0, 1..200)
    ) {
        let hours = minutes_to_hours(&minutes);

        let of_hours = quartiles(&hours).expect("non-empty input");
        let of_minutes = quartiles(&minutes).expect("non-empty input");

        let tol = 1e-9;
        prop_assert!((of_hours.median - of_minutes.median / 60.0).abs() <= tol * (1.0 + of_minutes.median.abs()));
        prop_assert!((of_hours.q1 - of_minutes.q1 / 60.0).abs() <= tol * (1.0 + of_minutes.q1.abs()));
        prop_assert!((of_hours.q3 - of_minutes.q3 / 60.0).abs() <= tol * (1.0 + of_minutes.q3.abs()));
        prop_assert!((of_hours.iqr() - of_minutes.iqr() / 60.0).abs() <= tol * (1.0 + of_minutes.iqr().abs()));
    }

    /// Quartiles are order-independent.
    #[test]
    fn quartiles_ignore_input_order(
        mut values in prop::collection::vec(-1_000.0f64..1_000.0, 2..100)
    ) {
        let forward = quartiles(&values).expect("non-empty input");
        values.reverse();
        let reversed = quartiles(&values).expect("non-empty input");

        prop_assert_eq!(forward.median, reversed.median);
        prop_assert_eq!(forward.q1, reversed.q1);
        prop_assert_eq!(forward.q3, reversed.q3);
    }
}

use boxplot_rs::core::{BoxSummary, outliers, quartiles, whisker_range};
use proptest::prelude::*;

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

proptest! {
    #[test]
    fn quartiles_are_ordered_within_bounds(
        values in prop::collection::vec(-1_000_000.0f64..1_000_000.0, 1..64)
    ) {
        let values = sorted(values);
        let [q1, median, q3] = quartiles(&values).expect("quartiles");
        let min = values[0];
        let max = values[values.len() - 1];

        prop_assert!(min <= q1);
        prop_assert!(q1 <= median);
        prop_assert!(median <= q3);
        prop_assert!(q3 <= max);
    }

    #[test]
    fn whisker_span_and_outliers_partition_indices(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..64),
        k in 0.0f64..3.0
    ) {
        let values = sorted(values);
        let span = whisker_range(&values, k);
        let outside = outliers(values.len(), span);

        let inside: Vec<usize> = match span {
            Some((low, high)) => (low..=high).collect(),
            None => Vec::new(),
        };
        let mut all: Vec<usize> = inside.iter().chain(outside.iter()).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..values.len()).collect::<Vec<_>>());
        prop_assert!(inside.iter().all(|index| !outside.contains(index)));
    }

    #[test]
    fn whisker_values_stay_inside_fences(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..64)
    ) {
        let values = sorted(values);
        let summary = BoxSummary::compute(&values, 1.5).expect("summary");
        let [q1, _, q3] = summary.quartiles;
        let iqr = q3 - q1;

        if let Some((low, high)) = summary.whisker_values(&values) {
            prop_assert!(low >= q1 - 1.5 * iqr);
            prop_assert!(high <= q3 + 1.5 * iqr);
        }
    }
}

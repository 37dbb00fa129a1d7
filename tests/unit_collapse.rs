//! Unit tests for collapsing, regrouping, and iteration summaries.

use demarray::{
    collapse_iterations, regroup_intervals, Aggregator, ArrayBuilder, ArrayKind, Collapse,
    DemarrayError, DemographicArray, DimScale, DimType, IterationCollapse, Notice,
};

/// Counts over age (2 intervals) by sex, row-major [age, sex].
fn age_sex_counts(data: &[f64]) -> DemographicArray<f64> {
    ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("sex", DimType::Sex, &["female", "male"])
        .data(data.to_vec())
        .build()
        .unwrap()
        .array
}

#[test]
fn test_counts_sum_over_one_dimension() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let out = a.sum_over(&["sex"]).unwrap();
    assert_eq!(out.array.metadata().names(), vec!["age"]);
    assert_eq!(out.array.data(), &[3.0, 7.0]);
    assert!(out.notices.is_empty());
}

#[test]
fn test_keep_margin_is_the_complement() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let out = Collapse::keep_margin(&["sex"]).run(&a).unwrap();
    assert_eq!(out.array.metadata().names(), vec!["sex"]);
    assert_eq!(out.array.data(), &[4.0, 6.0]);
}

#[test]
fn test_collapse_everything_to_scalar() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let out = a.sum_over(&["age", "sex"]).unwrap();
    assert_eq!(out.array.metadata().ndim(), 0);
    assert_eq!(out.array.data(), &[10.0]);
    assert_eq!(out.array.get(&[]), Some(10.0));
    assert_eq!(out.array.data()[0], a.total());
}

#[test]
fn test_mean_aggregator() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let out = Collapse::drop_dims(&["sex"])
        .aggregator(Aggregator::Mean)
        .run(&a)
        .unwrap();
    assert_eq!(out.array.data(), &[1.5, 3.5]);
}

#[test]
fn test_values_require_weights() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let err = v.sum_over(&["sex"]).unwrap_err();
    assert!(matches!(err, DemarrayError::MissingWeights { .. }));
}

#[test]
fn test_weights_must_be_counts() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let w = age_sex_counts(&[1.0, 1.0, 1.0, 1.0]).to_values();
    let err = v.weighted_mean_over(&["sex"], &w).unwrap_err();
    assert!(matches!(err, DemarrayError::MissingWeights { .. }));
}

#[test]
fn test_weighted_mean() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let w = age_sex_counts(&[10.0, 30.0, 20.0, 20.0]);
    let out = v.weighted_mean_over(&["sex"], &w).unwrap();
    // (1*10 + 2*30) / 40 and (3*20 + 4*20) / 40.
    assert_eq!(out.array.data(), &[1.75, 3.5]);
    assert_eq!(out.array.kind(), ArrayKind::Values);
}

#[test]
fn test_zero_total_weight_is_nan_not_zero() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let w = age_sex_counts(&[0.0, 0.0, 20.0, 20.0]);
    let out = v.weighted_mean_over(&["sex"], &w).unwrap();
    assert!(out.array.data()[0].is_nan());
    assert_eq!(out.array.data()[1], 3.5);
}

#[test]
fn test_unweighted_collapse_equivalence() {
    // All weights 1: the weighted mean is the arithmetic mean.
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let w = age_sex_counts(&[1.0, 1.0, 1.0, 1.0]);
    let out = v.weighted_mean_over(&["sex"], &w).unwrap();
    assert_eq!(out.array.data(), &[1.5, 3.5]);
}

#[test]
fn test_extraneous_weight_dimensions_are_summed_out() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    // Weights carry an extra region dimension, [age, sex, region].
    let w = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("sex", DimType::Sex, &["female", "male"])
        .dimension("region", DimType::State, &["north", "south"])
        .data(vec![4.0, 6.0, 10.0, 20.0, 8.0, 12.0, 10.0, 10.0])
        .build()
        .unwrap()
        .array;
    let out = v.weighted_mean_over(&["sex"], &w).unwrap();
    // Region sums to weights [10, 30, 20, 20].
    assert_eq!(out.array.data(), &[1.75, 3.5]);
    assert_eq!(
        out.notices,
        vec![Notice::CollapsedWeightDimensions {
            dimensions: vec!["region".to_string()]
        }]
    );
}

#[test]
fn test_weights_lacking_a_value_dimension_fail() {
    let v = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]).to_values();
    let w = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .data(vec![1.0, 1.0])
        .build()
        .unwrap()
        .array;
    let err = v.weighted_mean_over(&["sex"], &w).unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::MismatchedDimensions { ref dimensions, .. } if dimensions == &["sex"]
    ));
}

#[test]
fn test_weight_label_trimming_carries_notices() {
    let v = ArrayBuilder::values()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .data(vec![1.0, 2.0, 3.0])
        .build()
        .unwrap()
        .array;
    let w = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .data(vec![10.0, 30.0])
        .build()
        .unwrap()
        .array;
    let out = Collapse::drop_dims(&["age"]).weights(&w).run(&v).unwrap();
    // The value operand loses 10-14, then (1*10 + 2*30) / 40.
    assert_eq!(out.array.data(), &[1.75]);
    assert_eq!(out.notices.len(), 1);
    assert!(out.notices[0].concerns("age"));
}

#[test]
fn test_unknown_dimension_fails() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let err = a.sum_over(&["cohort"]).unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

// ============================================================================
// Interval Regrouping
// ============================================================================

#[test]
fn test_regroup_counts_sums_subsumed_bins() {
    let a = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .data(vec![1.0, 2.0, 3.0])
        .build()
        .unwrap()
        .array;
    let out = regroup_intervals(&a, "age", &[0.0, 10.0, 15.0], None).unwrap();
    assert_eq!(out.array.data(), &[3.0, 3.0]);
    assert_eq!(
        out.array.metadata().dim("age").unwrap().display_labels(),
        vec!["0-9", "10-14"]
    );
}

#[test]
fn test_regroup_weighted_values() {
    let v = ArrayBuilder::values()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .data(vec![1.0, 2.0, 3.0])
        .build()
        .unwrap()
        .array;
    let w = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .data(vec![10.0, 30.0, 5.0])
        .build()
        .unwrap()
        .array;
    let out = regroup_intervals(&v, "age", &[0.0, 10.0, 15.0], Some(&w)).unwrap();
    assert_eq!(out.array.data(), &[1.75, 3.0]);
}

#[test]
fn test_regroup_rejects_foreign_breakpoints() {
    let a = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .data(vec![1.0, 2.0, 3.0])
        .build()
        .unwrap()
        .array;
    // 7 is not an existing breakpoint.
    let err = regroup_intervals(&a, "age", &[0.0, 7.0, 15.0], None).unwrap_err();
    assert!(matches!(err, DemarrayError::Parse { .. }));

    // Endpoints must coincide with the existing ones.
    let err = regroup_intervals(&a, "age", &[5.0, 15.0], None).unwrap_err();
    assert!(matches!(err, DemarrayError::Parse { .. }));
}

// ============================================================================
// Iteration Collapsing
// ============================================================================

/// Counts over 5 draws for a single age group.
fn draws_array() -> DemographicArray<f64> {
    ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4"])
        .dimension("iteration", DimType::Iterations, &["1", "2", "3", "4", "5"])
        .data(vec![1.0, 2.0, 3.0, 4.0, 5.0])
        .build()
        .unwrap()
        .array
}

#[test]
fn test_collapse_iterations_to_default_quantiles() {
    let a = draws_array();
    let out = collapse_iterations(&a, IterationCollapse::default_quantiles()).unwrap();

    let q = out.metadata().dim("quantile").unwrap();
    assert_eq!(q.dimtype(), DimType::Quantiles);
    assert_eq!(
        q.display_labels(),
        vec!["2.5%", "25%", "50%", "75%", "97.5%"]
    );
    // Type-7 interpolation over draws 1..=5.
    let expected = [1.1, 2.0, 3.0, 4.0, 4.9];
    for (got, want) in out.data().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "got {}, want {}", got, want);
    }
    // The tag is unchanged by iteration collapsing.
    assert_eq!(out.kind(), ArrayKind::Counts);
}

#[test]
fn test_collapse_iterations_to_named_summaries() {
    fn mean(draws: &[f64]) -> f64 {
        draws.iter().sum::<f64>() / draws.len() as f64
    }
    fn spread(draws: &[f64]) -> f64 {
        let mut lo = draws[0];
        let mut hi = draws[0];
        for &d in draws {
            lo = lo.min(d);
            hi = hi.max(d);
        }
        hi - lo
    }

    let a = draws_array();
    let spec = IterationCollapse::Summaries(vec![
        ("mean".to_string(), mean as fn(&[f64]) -> f64),
        ("spread".to_string(), spread),
    ]);
    let out = collapse_iterations(&a, spec).unwrap();

    let s = out.metadata().dim("summary").unwrap();
    assert_eq!(s.dimscale(), DimScale::Categories);
    assert_eq!(s.display_labels(), vec!["mean", "spread"]);
    assert_eq!(out.data(), &[3.0, 4.0]);
}

#[test]
fn test_collapse_iterations_with_caller_probabilities() {
    let a = draws_array();
    let out =
        collapse_iterations(&a, IterationCollapse::Quantiles(vec![0.5])).unwrap();
    assert_eq!(out.data(), &[3.0]);
}

#[test]
fn test_collapse_iterations_without_iterations_dimension() {
    let a = age_sex_counts(&[1.0, 2.0, 3.0, 4.0]);
    let err = collapse_iterations(&a, IterationCollapse::default_quantiles()).unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

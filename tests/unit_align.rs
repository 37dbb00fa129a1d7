//! Unit tests for alignment and elementwise arithmetic.

use demarray::{
    arith, AlignPolicy, ArrayBuilder, ArrayKind, DemarrayError, DimScale, DimType, Notice,
    Operand, Operator,
};

/// One-dimensional counts array over age intervals.
fn age_counts(labels: &[&str], data: &[f64]) -> demarray::DemographicArray<f64> {
    ArrayBuilder::counts()
        .dimension("age", DimType::Age, labels)
        .data(data.to_vec())
        .build()
        .unwrap()
        .array
}

#[test]
fn test_add_identical_metadata() {
    let a = age_counts(&["0-4", "5-9"], &[1.0, 2.0]);
    let b = age_counts(&["0-4", "5-9"], &[10.0, 20.0]);
    let out = a.add(&b).unwrap();
    assert_eq!(out.array.data(), &[11.0, 22.0]);
    assert_eq!(out.array.kind(), ArrayKind::Counts);
    assert!(out.notices.is_empty());
}

#[test]
fn test_division_of_counts_yields_values() {
    let a = age_counts(&["0-4", "5-9"], &[1.0, 2.0]);
    let b = age_counts(&["0-4", "5-9"], &[4.0, 8.0]);
    let out = a.div(&b).unwrap();
    assert_eq!(out.array.kind(), ArrayKind::Values);
    assert_eq!(out.array.data(), &[0.25, 0.25]);
}

#[test]
fn test_values_operand_makes_values() {
    let a = age_counts(&["0-4", "5-9"], &[1.0, 2.0]).to_values();
    let b = age_counts(&["0-4", "5-9"], &[1.0, 2.0]);
    let out = a.add(&b).unwrap();
    assert_eq!(out.array.kind(), ArrayKind::Values);
}

#[test]
fn test_trimming_to_shared_labels() {
    // The overlap is {5-9, 10-14}; each operand loses one label.
    let a = age_counts(&["0-4", "5-9", "10-14"], &[1.0, 2.0, 3.0]);
    let b = age_counts(&["5-9", "10-14", "15-19"], &[4.0, 6.0, 8.0]);
    let out = a.div(&b).unwrap();

    assert_eq!(
        out.array.metadata().dim("age").unwrap().display_labels(),
        vec!["5-9", "10-14"]
    );
    assert_eq!(out.array.data(), &[0.5, 0.5]);

    // One trimming notice per operand.
    assert_eq!(out.notices.len(), 2);
    assert!(out.notices.contains(&Notice::TrimmedLabels {
        dimension: "age".to_string(),
        operand: Operand::Left,
        dropped: vec!["0-4".to_string()],
    }));
    assert!(out.notices.contains(&Notice::TrimmedLabels {
        dimension: "age".to_string(),
        operand: Operand::Right,
        dropped: vec!["15-19".to_string()],
    }));
}

#[test]
fn test_empty_intersection_fails() {
    let a = age_counts(&["0-4", "5-9"], &[1.0, 2.0]);
    let b = age_counts(&["10-14", "15-19"], &[1.0, 2.0]);
    let err = a.add(&b).unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::EmptyIntersection { ref dimension } if dimension == "age"
    ));
}

#[test]
fn test_strict_policy_rejects_trimming() {
    let a = age_counts(&["0-4", "5-9", "10-14"], &[1.0, 2.0, 3.0]);
    let b = age_counts(&["5-9", "10-14", "15-19"], &[4.0, 6.0, 8.0]);
    let err = arith(&a, &b, Operator::Div, AlignPolicy::Strict).unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_shared_dimension_scale_mismatch() {
    let a = age_counts(&["0-4", "5-9"], &[1.0, 2.0]);
    let b = ArrayBuilder::counts()
        .dimension_scaled("age", DimType::Age, &["0", "5"], DimScale::Points)
        .data(vec![1.0, 2.0])
        .build()
        .unwrap()
        .array;
    let err = a.add(&b).unwrap_err();
    assert!(matches!(err, DemarrayError::IncompatibleDimscale { .. }));
}

#[test]
fn test_cardinality_one_extra_dimension_is_dropped() {
    let a = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("region", DimType::State, &["total"])
        .data(vec![1.0, 2.0])
        .build()
        .unwrap()
        .array;
    let b = age_counts(&["0-4", "5-9"], &[10.0, 20.0]);
    let out = a.add(&b).unwrap();
    assert_eq!(out.array.metadata().names(), vec!["age"]);
    assert_eq!(out.array.data(), &[11.0, 22.0]);
}

#[test]
fn test_wide_extra_dimension_fails() {
    let a = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("region", DimType::State, &["north", "south"])
        .data(vec![1.0, 2.0, 3.0, 4.0])
        .build()
        .unwrap()
        .array;
    let b = age_counts(&["0-4", "5-9"], &[10.0, 20.0]);
    let err = a.add(&b).unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::MismatchedDimensions { ref dimensions, .. } if dimensions == &["region"]
    ));
}

#[test]
fn test_right_operand_is_permuted_to_left_order() {
    let a = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("region", DimType::State, &["north", "south"])
        .data(vec![1.0, 2.0, 3.0, 4.0])
        .build()
        .unwrap()
        .array;
    // Same data, dimensions declared the other way round.
    let b = ArrayBuilder::counts()
        .dimension("region", DimType::State, &["north", "south"])
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .data(vec![1.0, 3.0, 2.0, 4.0])
        .build()
        .unwrap()
        .array;
    let out = a.sub(&b).unwrap();
    assert_eq!(out.array.metadata().names(), vec!["age", "region"]);
    assert_eq!(out.array.data(), &[0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_category_reorder_without_trim_emits_no_notice() {
    let a = ArrayBuilder::counts()
        .dimension("region", DimType::State, &["north", "south"])
        .data(vec![1.0, 2.0])
        .build()
        .unwrap()
        .array;
    let b = ArrayBuilder::counts()
        .dimension("region", DimType::State, &["south", "north"])
        .data(vec![20.0, 10.0])
        .build()
        .unwrap()
        .array;
    let out = a.add(&b).unwrap();
    assert!(out.notices.is_empty());
    assert_eq!(out.array.data(), &[11.0, 22.0]);
}

#[test]
fn test_add_then_sub_restores_left_operand() {
    let a = age_counts(&["0-4", "5-9"], &[3.0, 7.0]);
    let b = age_counts(&["0-4", "5-9"], &[1.0, 9.0]);
    let sum = a.add(&b).unwrap().array;
    let back = sum.sub(&b).unwrap().array;
    assert_eq!(back.data(), a.data());
    assert_eq!(back.metadata(), a.metadata());
}

//! Unit tests for binding arrays along one dimension.

use demarray::{bind, ArrayBuilder, DemarrayError, DemographicArray, DimScale, DimType};

fn region_counts(labels: &[&str], data: &[f64]) -> DemographicArray<f64> {
    ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .dimension("region", DimType::State, labels)
        .data(data.to_vec())
        .build()
        .unwrap()
        .array
}

#[test]
fn test_bind_categories() {
    let a = region_counts(&["north"], &[1.0, 2.0]);
    let b = region_counts(&["south", "east"], &[3.0, 4.0, 5.0, 6.0]);
    let out = bind(&[&a, &b], "region").unwrap();

    assert_eq!(out.metadata().names(), vec!["age", "region"]);
    assert_eq!(
        out.metadata().dim("region").unwrap().display_labels(),
        vec!["north", "south", "east"]
    );
    // [age, region] row-major: age0 = [1, 3, 4], age1 = [2, 5, 6].
    assert_eq!(out.data(), &[1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
}

#[test]
fn test_bind_permutes_operands_to_first_order() {
    let a = region_counts(&["north"], &[1.0, 2.0]);
    // Same content as region_counts(&["south"], ...) with axes swapped.
    let b = ArrayBuilder::counts()
        .dimension("region", DimType::State, &["south"])
        .dimension("age", DimType::Age, &["0-4", "5-9"])
        .data(vec![3.0, 4.0])
        .build()
        .unwrap()
        .array;
    let out = bind(&[&a, &b], "region").unwrap();
    assert_eq!(out.metadata().names(), vec!["age", "region"]);
    assert_eq!(out.data(), &[1.0, 3.0, 2.0, 4.0]);
}

#[test]
fn test_bind_rejects_overlapping_categories() {
    let a = region_counts(&["north", "south"], &[1.0, 2.0, 3.0, 4.0]);
    let b = region_counts(&["south"], &[5.0, 6.0]);
    let err = bind(&[&a, &b], "region").unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_bind_points_must_stay_increasing() {
    let year = |labels: &[&str], data: &[f64]| {
        ArrayBuilder::counts()
            .dimension_scaled("time", DimType::Time, labels, DimScale::Points)
            .data(data.to_vec())
            .build()
            .unwrap()
            .array
    };
    let a = year(&["2000", "2001"], &[1.0, 2.0]);
    let b = year(&["2002"], &[3.0]);
    let out = bind(&[&a, &b], "time").unwrap();
    assert_eq!(
        out.metadata().dim("time").unwrap().display_labels(),
        vec!["2000", "2001", "2002"]
    );

    let err = bind(&[&b, &a], "time").unwrap_err();
    assert!(matches!(err, DemarrayError::NonMonotonicBind { .. }));
}

#[test]
fn test_bind_intervals_require_exact_chaining() {
    let ages = |labels: &[&str], data: &[f64]| {
        ArrayBuilder::counts()
            .dimension("age", DimType::Age, labels)
            .data(data.to_vec())
            .build()
            .unwrap()
            .array
    };
    let a = ages(&["0-4", "5-9"], &[1.0, 2.0]);
    let b = ages(&["10-14"], &[3.0]);
    let out = bind(&[&a, &b], "age").unwrap();
    assert_eq!(
        out.metadata().dim("age").unwrap().display_labels(),
        vec!["0-4", "5-9", "10-14"]
    );
    assert_eq!(out.data(), &[1.0, 2.0, 3.0]);

    // A gap would fabricate a phantom interval.
    let c = ages(&["15-19"], &[4.0]);
    let err = bind(&[&a, &c], "age").unwrap_err();
    assert!(matches!(err, DemarrayError::NonMonotonicBind { .. }));
}

#[test]
fn test_bind_rejects_differing_non_along_labels() {
    let a = region_counts(&["north"], &[1.0, 2.0]);
    let b = ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-14"])
        .dimension("region", DimType::State, &["south"])
        .data(vec![3.0, 4.0])
        .build()
        .unwrap()
        .array;
    let err = bind(&[&a, &b], "region").unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::MismatchedDimensions { ref dimensions, .. } if dimensions == &["age"]
    ));
}

#[test]
fn test_bind_rejects_mixed_kinds() {
    let a = region_counts(&["north"], &[1.0, 2.0]);
    let b = region_counts(&["south"], &[3.0, 4.0]).to_values();
    let err = bind(&[&a, &b], "region").unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_bind_needs_two_operands() {
    let a = region_counts(&["north"], &[1.0, 2.0]);
    let err = bind(&[&a], "region").unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_bind_reverses_a_subset_partition() {
    let x = region_counts(&["north", "south", "east"], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let kept = x.subset("region", &["north", "east"]).unwrap();
    let rest = x.subset("region", &["south"]).unwrap();
    let rebound = bind(&[&kept, &rest], "region").unwrap();

    // Reconstruction up to label ordering.
    assert_eq!(
        rebound.metadata().dim("region").unwrap().display_labels(),
        vec!["north", "east", "south"]
    );
    let reordered = rebound.subset("region", &["north"]).unwrap();
    assert_eq!(reordered.data(), &[1.0, 4.0]);
    assert_eq!(rebound.total(), x.total());
}

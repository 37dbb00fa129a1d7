//! Unit tests for label-based subsetting.

use demarray::{
    ArrayBuilder, DemarrayError, DemographicArray, DimType, LabelFilter, Labels, Subset,
};

fn age_region(data: &[f64]) -> DemographicArray<f64> {
    ArrayBuilder::counts()
        .dimension("age", DimType::Age, &["0-4", "5-9", "10-14"])
        .dimension("region", DimType::State, &["north", "south"])
        .data(data.to_vec())
        .build()
        .unwrap()
        .array
}

#[test]
fn test_keep_explicit_labels() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let out = a.subset("region", &["south"]).unwrap();
    assert_eq!(out.metadata().dim("region").unwrap().display_labels(), vec!["south"]);
    assert_eq!(out.data(), &[2.0, 4.0, 6.0]);
}

#[test]
fn test_numeric_range_on_intervals() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    // Containment bounds compare against breakpoints: [0,5) and [5,10)
    // both lie within [-inf, 10].
    let out = Subset::new()
        .filter("age", LabelFilter::at_most(10.0))
        .run(&a)
        .unwrap();
    assert_eq!(
        out.metadata().dim("age").unwrap().display_labels(),
        vec!["0-4", "5-9"]
    );
    // The retained breakpoints are re-sliced.
    assert_eq!(
        out.metadata().dim("age").unwrap().labels(),
        &Labels::Intervals(vec![0.0, 5.0, 10.0])
    );
    assert_eq!(out.data(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_conditions_combine_across_dimensions() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let out = Subset::new()
        .filter("age", LabelFilter::between(5.0, 15.0))
        .keep("region", &["north"])
        .run(&a)
        .unwrap();
    assert_eq!(out.data(), &[3.0, 5.0]);
}

#[test]
fn test_noncontiguous_interval_selection_fails() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let err = a.subset("age", &["0-4", "10-14"]).unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::Parse { ref dimension, .. } if dimension == "age"
    ));
}

#[test]
fn test_empty_selection_fails() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let err = a.subset("region", &["west"]).unwrap_err();
    assert!(matches!(
        err,
        DemarrayError::EmptyResult { ref dimension } if dimension == "region"
    ));
}

#[test]
fn test_unknown_dimension_fails() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let err = a.subset("sex", &["female"]).unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_iterations_are_renumbered() {
    let a = ArrayBuilder::counts()
        .dimension("iteration", DimType::Iterations, &["1", "2", "3", "4"])
        .data(vec![10.0, 20.0, 30.0, 40.0])
        .build()
        .unwrap()
        .array;
    let out = Subset::new()
        .filter("iteration", LabelFilter::one_of(&["2", "4"]))
        .run(&a)
        .unwrap();
    assert_eq!(out.data(), &[20.0, 40.0]);
    // Retained draws renumber to 1..=2.
    assert_eq!(
        out.metadata().dim("iteration").unwrap().display_labels(),
        vec!["1", "2"]
    );
}

#[test]
fn test_callback_selection_is_normalized_to_label_order() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let out = Subset::new()
        .select_with("age", |labels| {
            // Deliberately unordered and duplicated.
            let mut idx: Vec<usize> = (0..labels.len()).filter(|&i| i != 2).rev().collect();
            idx.push(0);
            idx
        })
        .run(&a)
        .unwrap();
    assert_eq!(
        out.metadata().dim("age").unwrap().display_labels(),
        vec!["0-4", "5-9"]
    );
}

#[test]
fn test_callback_out_of_range_fails() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let err = Subset::new()
        .select_with("age", |_| vec![7])
        .run(&a)
        .unwrap_err();
    assert!(matches!(err, DemarrayError::MismatchedDimensions { .. }));
}

#[test]
fn test_filter_composition() {
    let a = age_region(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    // NOT(0-4) AND (below 10 OR the 10-14 bin) = {5-9, 10-14}.
    let filter = LabelFilter::AllOf(vec![
        LabelFilter::one_of(&["0-4"]).negate(),
        LabelFilter::AnyOf(vec![
            LabelFilter::at_most(10.0),
            LabelFilter::one_of(&["10-14"]),
        ]),
    ]);
    let out = Subset::new().filter("age", filter).run(&a).unwrap();
    assert_eq!(
        out.metadata().dim("age").unwrap().display_labels(),
        vec!["5-9", "10-14"]
    );
}

#[test]
fn test_subset_narrows_a_sex_dimension() {
    let a = ArrayBuilder::counts()
        .dimension("sex", DimType::Sex, &["female", "male"])
        .data(vec![5.0, 6.0])
        .build()
        .unwrap()
        .array;
    let out = a.subset("sex", &["female"]).unwrap();
    assert_eq!(out.data(), &[5.0]);
    assert_eq!(
        out.metadata().dim("sex").unwrap().display_labels(),
        vec!["female"]
    );
}

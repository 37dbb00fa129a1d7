//! Metadata-aware manipulation of cross-tabulated demographic arrays.
//!
//! A demographic array is numeric cross-tabulated data (counts of people
//! or events, or values derived from them) where every dimension carries
//! semantic metadata: a *dimtype* naming what kind of axis it is (age,
//! time, sex, ...) and a *dimscale* saying how its labels are read
//! (points, intervals, categories, ...). The engines here use that
//! metadata to infer dimension semantics from raw labels, reconcile two
//! arrays before elementwise arithmetic, collapse dimensions with or
//! without weights, concatenate arrays, and subset them, all while
//! preserving the semantic invariants (counts are summable, values need
//! weights; a sex dimension has exactly two categories; paired
//! origin/destination dimensions carry identical category sets).
//!
//! # Example
//!
//! ```
//! use demarray::{ArrayBuilder, DimType};
//!
//! let built = ArrayBuilder::<f64>::counts()
//!     .dimension("age", DimType::Age, &["0-4", "5-9", "10+"])
//!     .dimension("sex", DimType::Sex, &["female", "male"])
//!     .data(vec![10.0, 11.0, 8.0, 9.0, 30.0, 32.0])
//!     .build()
//!     .unwrap();
//! let by_age = built.array.sum_over(&["sex"]).unwrap().array;
//! assert_eq!(by_age.data(), &[21.0, 17.0, 62.0]);
//! ```
//!
//! Every operation returns a new array; inputs are never mutated.
//! Recoverable-by-design behavior (shared-label trimming, the assumed
//! age-interval default, automatic collapsing of extraneous weight
//! dimensions) succeeds and attaches machine-readable [`Notice`] values
//! to the result; everything else fails with a [`DemarrayError`] naming
//! the offending dimension(s).

/// Layer 1: errors, notices, layout arithmetic.
pub mod primitives;

/// Layer 2: the dimension model and dimscale inference.
pub mod model;

/// Layer 3: the tagged array value and interop coercions.
pub mod array;

/// Layer 4: the alignment, collapse, bind, and subset engines.
pub mod engine;

/// Layer 5: the construction builder and stable re-exports.
pub mod api;

pub use api::{
    arith, bind, collapse_iterations, infer_dimension, regroup_intervals, Aggregator, AlignPolicy,
    ArrayBuilder, ArrayKind, ArrayMetadata, ArrayOutput, Cell, Collapse, DemarrayError,
    DemographicArray, DimScale, DimType, Dimension, Inference, IterationCollapse, LabelFilter,
    LabeledArray, Labels, LongRow, LongTable, Notice, Operand, Operator, Result, Sex, Subset,
    SummaryFn, Triangle,
};

/// Everything a typical caller needs.
pub mod prelude {
    pub use crate::api::{
        arith, bind, collapse_iterations, regroup_intervals, Aggregator, AlignPolicy,
        ArrayBuilder, ArrayKind, ArrayOutput, Collapse, DemarrayError, DemographicArray, DimScale,
        DimType, IterationCollapse, LabelFilter, Notice, Operand, Operator, Subset,
    };
}

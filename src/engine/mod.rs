//! Layer 4: Engines
//!
//! The four operation engines over demographic arrays.
//!
//! # Module Organization
//!
//! - **align**: shared-dimension reconciliation and elementwise arithmetic
//! - **collapse**: dimension reduction, regrouping, iteration summaries
//! - **bind**: concatenation along one dimension
//! - **subset**: predicate/label-based filtering

/// Alignment and elementwise arithmetic.
pub mod align;

/// Dimension reduction.
pub mod collapse;

/// Concatenation along one dimension.
pub mod bind;

/// Label-based filtering.
pub mod subset;

/// Elementwise loops shorter than this stay sequential; parallelism below
/// it costs more than it saves.
pub(crate) const PAR_THRESHOLD: usize = 4096;

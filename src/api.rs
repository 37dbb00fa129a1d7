//! High-level API for constructing demographic arrays.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point: a fluent
//! [`ArrayBuilder`] that consumes a raw N-dimensional buffer plus raw
//! label strings per axis, runs dimscale inference over each axis, and
//! assembles a validated [`DemographicArray`]. It also hosts the
//! crate-wide [`Result`] alias and the stable re-exports.
//!
//! ## Design notes
//!
//! * **Ergonomic**: fluent builder; dimensions are declared in buffer
//!   order and only the dimtype is mandatory per axis.
//! * **Validated**: everything is checked at `build()`: inference,
//!   the compatibility table, paired-category constraints, and the
//!   buffer-length/shape agreement.
//! * **Auditable**: the build output carries the notices inference
//!   emitted (e.g. the assumed age-interval default).
//!
//! ## Key concepts
//!
//! ### Configuration flow
//!
//! 1. Create a builder via `ArrayBuilder::counts()` or `::values()`.
//! 2. Declare each axis with `.dimension(...)` (inferred dimscale) or
//!    `.dimension_scaled(...)` (explicit override).
//! 3. Attach the row-major buffer with `.data(...)`.
//! 4. `build()` returns the array plus notices.
//!
//! ## Visibility
//!
//! This is the primary public API. Types re-exported here are considered
//! stable.

use num_traits::Float;

// Publicly re-exported types.
pub use crate::array::convert::{Cell, LabeledArray, LongRow, LongTable};
pub use crate::array::{ArrayKind, ArrayOutput, DemographicArray};
pub use crate::engine::align::{arith, AlignPolicy, Operator};
pub use crate::engine::bind::bind;
pub use crate::engine::collapse::{
    collapse_iterations, regroup_intervals, Aggregator, Collapse, IterationCollapse, SummaryFn,
};
pub use crate::engine::subset::{LabelFilter, Subset};
pub use crate::model::dimension::Dimension;
pub use crate::model::infer::{infer_dimension, Inference};
pub use crate::model::labels::Labels;
pub use crate::model::metadata::ArrayMetadata;
pub use crate::model::scale::{DimScale, DimType, Sex, Triangle};
pub use crate::primitives::errors::DemarrayError;
pub use crate::primitives::notices::{Notice, Operand};

/// Result type alias for demographic array operations.
pub type Result<T> = std::result::Result<T, DemarrayError>;

// ============================================================================
// Array Builder
// ============================================================================

/// One declared axis awaiting inference.
#[derive(Debug, Clone)]
struct RawDimension {
    name: String,
    dimtype: DimType,
    labels: Vec<String>,
    scale: Option<DimScale>,
}

/// Fluent builder assembling a demographic array from raw input.
#[derive(Debug, Clone)]
pub struct ArrayBuilder<T> {
    kind: ArrayKind,
    dims: Vec<RawDimension>,
    data: Option<Vec<T>>,
}

impl<T: Float> ArrayBuilder<T> {
    /// Start a Counts array.
    pub fn counts() -> Self {
        ArrayBuilder {
            kind: ArrayKind::Counts,
            dims: Vec::new(),
            data: None,
        }
    }

    /// Start a Values array.
    pub fn values() -> Self {
        ArrayBuilder {
            kind: ArrayKind::Values,
            dims: Vec::new(),
            data: None,
        }
    }

    /// Declare the next axis; the dimscale is inferred from the labels.
    pub fn dimension(mut self, name: &str, dimtype: DimType, labels: &[&str]) -> Self {
        self.dims.push(RawDimension {
            name: name.to_string(),
            dimtype,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            scale: None,
        });
        self
    }

    /// Declare the next axis with an explicit dimscale override.
    pub fn dimension_scaled(
        mut self,
        name: &str,
        dimtype: DimType,
        labels: &[&str],
        scale: DimScale,
    ) -> Self {
        self.dims.push(RawDimension {
            name: name.to_string(),
            dimtype,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            scale: Some(scale),
        });
        self
    }

    /// Attach the row-major buffer.
    pub fn data(mut self, data: Vec<T>) -> Self {
        self.data = Some(data);
        self
    }

    /// Run inference, validate everything, and assemble the array.
    pub fn build(self) -> Result<ArrayOutput<T>> {
        let mut dims = Vec::with_capacity(self.dims.len());
        let mut notices = Vec::new();
        for raw in &self.dims {
            let inferred = infer_dimension(raw.name.clone(), raw.dimtype, &raw.labels, raw.scale)?;
            notices.extend(inferred.notices);
            dims.push(inferred.dimension);
        }
        let metadata = ArrayMetadata::new(dims)?;
        let data = self.data.ok_or_else(|| DemarrayError::MismatchedDimensions {
            dimensions: metadata.names().iter().map(|s| s.to_string()).collect(),
            detail: "no data buffer supplied".to_string(),
        })?;
        let array = DemographicArray::new(self.kind, metadata, data)?;
        Ok(ArrayOutput { array, notices })
    }
}

//! Layer 3: Array
//!
//! The demographic array value: a Counts/Values-tagged numeric buffer
//! addressed by validated dimension metadata, plus the in-process
//! coercions to and from untyped shapes.
//!
//! # Module Organization
//!
//! - this module: `DemographicArray`, `ArrayKind`, `ArrayOutput`
//! - **convert**: `LabeledArray` and `LongTable` interop

use num_traits::Float;

use crate::model::metadata::ArrayMetadata;
use crate::primitives::errors::DemarrayError;
use crate::primitives::layout;
use crate::primitives::notices::Notice;

pub mod convert;

// ============================================================================
// ArrayKind
// ============================================================================

/// Whether a buffer holds counts (summable) or derived values (weighted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Cardinalities of people or events; summable without weights.
    Counts,

    /// Derived or measured quantities; aggregation requires weights.
    Values,
}

impl std::fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayKind::Counts => write!(f, "counts"),
            ArrayKind::Values => write!(f, "values"),
        }
    }
}

// ============================================================================
// DemographicArray
// ============================================================================

/// Cross-tabulated numeric data with per-dimension semantic metadata.
///
/// The buffer is row-major in dimension order. Arrays are immutable
/// values: every operation returns a new array and never mutates its
/// inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicArray<T> {
    kind: ArrayKind,
    metadata: ArrayMetadata,
    data: Vec<T>,
}

impl<T: Float> DemographicArray<T> {
    /// Construct an array, checking the buffer length against the metadata.
    pub fn new(
        kind: ArrayKind,
        metadata: ArrayMetadata,
        data: Vec<T>,
    ) -> Result<Self, DemarrayError> {
        if data.len() != metadata.element_count() {
            return Err(DemarrayError::MismatchedDimensions {
                dimensions: metadata.names().iter().map(|s| s.to_string()).collect(),
                detail: format!(
                    "buffer holds {} elements but the dimensions address {}",
                    data.len(),
                    metadata.element_count()
                ),
            });
        }
        Ok(DemographicArray {
            kind,
            metadata,
            data,
        })
    }

    /// Construct a Counts array.
    pub fn counts(metadata: ArrayMetadata, data: Vec<T>) -> Result<Self, DemarrayError> {
        Self::new(ArrayKind::Counts, metadata, data)
    }

    /// Construct a Values array.
    pub fn values(metadata: ArrayMetadata, data: Vec<T>) -> Result<Self, DemarrayError> {
        Self::new(ArrayKind::Values, metadata, data)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Counts or Values.
    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    /// Whether this is a Counts array.
    pub fn is_counts(&self) -> bool {
        self.kind == ArrayKind::Counts
    }

    /// The dimension metadata.
    pub fn metadata(&self) -> &ArrayMetadata {
        &self.metadata
    }

    /// The raw buffer, row-major in dimension order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Category count per dimension.
    pub fn shape(&self) -> Vec<usize> {
        self.metadata.shape()
    }

    /// Value at a multi-index, or None when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        let shape = self.shape();
        if index.len() != shape.len() || index.iter().zip(&shape).any(|(i, s)| i >= s) {
            return None;
        }
        let strides = layout::strides(&shape);
        Some(self.data[layout::offset(index, &strides)])
    }

    /// Sum of the raw buffer.
    pub fn total(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    // ========================================================================
    // Coercion
    // ========================================================================

    /// The same buffer and metadata under the Values tag.
    pub fn to_values(&self) -> Self {
        DemographicArray {
            kind: ArrayKind::Values,
            metadata: self.metadata.clone(),
            data: self.data.clone(),
        }
    }

    /// The same buffer and metadata under the Counts tag.
    pub fn to_counts(&self) -> Self {
        DemographicArray {
            kind: ArrayKind::Counts,
            metadata: self.metadata.clone(),
            data: self.data.clone(),
        }
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    /// A new array with axes reordered so new position `i` holds old
    /// position `order[i]`.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        let shape = self.shape();
        DemographicArray {
            kind: self.kind,
            metadata: self.metadata.permuted(order),
            data: layout::permute_axes(&self.data, &shape, order),
        }
    }

    /// A new array with dimensions reordered by name.
    pub fn permuted_by_names(&self, names: &[&str]) -> Result<Self, DemarrayError> {
        if names.len() != self.metadata.ndim() {
            return Err(DemarrayError::MismatchedDimensions {
                dimensions: names.iter().map(|s| s.to_string()).collect(),
                detail: format!(
                    "expected {} dimension names, got {}",
                    self.metadata.ndim(),
                    names.len()
                ),
            });
        }
        let mut order = Vec::with_capacity(names.len());
        for &name in names {
            match self.metadata.position(name) {
                Some(p) if !order.contains(&p) => order.push(p),
                _ => {
                    return Err(DemarrayError::MismatchedDimensions {
                        dimensions: vec![name.to_string()],
                        detail: "unknown or repeated dimension name".to_string(),
                    })
                }
            }
        }
        Ok(self.permuted(&order))
    }

    /// A new array retaining `keep[d]` indices along each dimension, with
    /// labels rederived per dimscale. Internal; engines bounds-check.
    pub(crate) fn gathered(&self, keep: &[Vec<usize>]) -> Result<Self, DemarrayError> {
        let shape = self.shape();
        let mut dims = Vec::with_capacity(self.metadata.ndim());
        for (dim, idx) in self.metadata.dims().iter().zip(keep) {
            dims.push(dim.with_labels(dim.labels().take(dim.name(), idx)?)?);
        }
        Ok(DemographicArray {
            kind: self.kind,
            metadata: ArrayMetadata::new(dims)?,
            data: layout::gather(&self.data, &shape, keep),
        })
    }

    /// Internal constructor for engines that have already validated.
    pub(crate) fn from_parts(kind: ArrayKind, metadata: ArrayMetadata, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), metadata.element_count());
        DemographicArray {
            kind,
            metadata,
            data,
        }
    }
}

// ============================================================================
// Operation Output
// ============================================================================

/// An operation result: the new array plus any informational notices.
#[derive(Debug, Clone)]
pub struct ArrayOutput<T> {
    /// The resulting array.
    pub array: DemographicArray<T>,

    /// Machine-readable notices for implicit behavior the operation applied.
    pub notices: Vec<Notice>,
}

impl<T> ArrayOutput<T> {
    /// Wrap an array with no notices.
    pub fn clean(array: DemographicArray<T>) -> Self {
        ArrayOutput {
            array,
            notices: Vec::new(),
        }
    }
}

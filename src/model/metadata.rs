//! The ordered dimension list of an array.
//!
//! ## Purpose
//!
//! This module defines [`ArrayMetadata`]: the ordered sequence of
//! dimensions that addresses an array's buffer. Construction validates the
//! cross-dimension invariants: unique names, and identical category sets
//! for each origin/destination and parent/child pair present together.
//!
//! ## Design notes
//!
//! * Dimension order is significant: it is the buffer's row-major axis
//!   order. Permutation produces new metadata; nothing is mutated.
//! * Paired dimensions are matched by stripping a `_orig`/`_dest` (or
//!   `_parent`/`_child`) suffix from their names; when an array carries
//!   exactly one dimension of each member type the pair is matched
//!   regardless of naming. Each pair's equality constraint is checked
//!   independently.
//! * Category-set equality for pairs compares label sets, not sequences:
//!   the two members may order their categories differently.
//!
//! ## Visibility
//!
//! [`ArrayMetadata`] is part of the public API.

use crate::model::dimension::Dimension;
use crate::model::scale::DimType;
use crate::primitives::errors::DemarrayError;

// ============================================================================
// ArrayMetadata
// ============================================================================

/// Ordered, validated dimension list of a demographic array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMetadata {
    dims: Vec<Dimension>,
}

impl ArrayMetadata {
    /// Validate a dimension list: unique names and paired-category equality.
    pub fn new(dims: Vec<Dimension>) -> Result<ArrayMetadata, DemarrayError> {
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].iter().any(|e| e.name() == d.name()) {
                return Err(DemarrayError::MismatchedDimensions {
                    dimensions: vec![d.name().to_string()],
                    detail: "duplicate dimension name".to_string(),
                });
            }
        }
        let meta = ArrayMetadata { dims };
        meta.check_pairs()?;
        Ok(meta)
    }

    /// The dimensions in buffer order.
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Number of dimensions (zero for a scalar array).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Category count per dimension, in buffer order.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dimension::len).collect()
    }

    /// Number of buffer elements the metadata addresses (1 for scalar).
    pub fn element_count(&self) -> usize {
        self.dims.iter().map(Dimension::len).product()
    }

    /// Position of a dimension by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d.name() == name)
    }

    /// Dimension by name.
    pub fn dim(&self, name: &str) -> Option<&Dimension> {
        self.dims.iter().find(|d| d.name() == name)
    }

    /// Dimension names in buffer order.
    pub fn names(&self) -> Vec<&str> {
        self.dims.iter().map(Dimension::name).collect()
    }

    // ========================================================================
    // Derivation Helpers
    // ========================================================================

    /// Metadata with axes reordered so new position `i` holds old position
    /// `order[i]`. Pair constraints are unaffected by reordering.
    pub(crate) fn permuted(&self, order: &[usize]) -> ArrayMetadata {
        debug_assert_eq!(order.len(), self.dims.len());
        ArrayMetadata {
            dims: order.iter().map(|&i| self.dims[i].clone()).collect(),
        }
    }

    /// Metadata without the dimensions at the given positions.
    pub(crate) fn without(&self, positions: &[usize]) -> ArrayMetadata {
        ArrayMetadata {
            dims: self
                .dims
                .iter()
                .enumerate()
                .filter(|(i, _)| !positions.contains(i))
                .map(|(_, d)| d.clone())
                .collect(),
        }
    }

    /// Metadata with the dimension at `position` replaced.
    pub(crate) fn replaced(
        &self,
        position: usize,
        dim: Dimension,
    ) -> Result<ArrayMetadata, DemarrayError> {
        let mut dims = self.dims.clone();
        dims[position] = dim;
        ArrayMetadata::new(dims)
    }

    // ========================================================================
    // Pair Constraints
    // ========================================================================

    /// Check origin/destination and parent/child category-set equality.
    fn check_pairs(&self) -> Result<(), DemarrayError> {
        self.check_pair(DimType::Origin, DimType::Destination, "_orig", "_dest")?;
        self.check_pair(DimType::Parent, DimType::Child, "_parent", "_child")
    }

    fn check_pair(
        &self,
        first: DimType,
        second: DimType,
        first_suffix: &str,
        second_suffix: &str,
    ) -> Result<(), DemarrayError> {
        let firsts: Vec<&Dimension> = self.dims.iter().filter(|d| d.dimtype() == first).collect();
        let seconds: Vec<&Dimension> = self.dims.iter().filter(|d| d.dimtype() == second).collect();
        if firsts.is_empty() || seconds.is_empty() {
            return Ok(());
        }

        for a in &firsts {
            let partner = if firsts.len() == 1 && seconds.len() == 1 {
                Some(seconds[0])
            } else {
                let stem = a.name().strip_suffix(first_suffix).unwrap_or(a.name());
                seconds
                    .iter()
                    .copied()
                    .find(|b| b.name().strip_suffix(second_suffix).unwrap_or(b.name()) == stem)
            };
            let Some(b) = partner else { continue };

            let mut left = a.display_labels();
            let mut right = b.display_labels();
            left.sort();
            right.sort();
            if left != right {
                return Err(DemarrayError::IncompatibleDimtype {
                    dimension: a.name().to_string(),
                    dimtype: first.as_str().to_string(),
                    detail: format!(
                        "category set differs from paired dimension `{}`",
                        b.name()
                    ),
                });
            }
        }
        Ok(())
    }
}

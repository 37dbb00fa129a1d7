//! A single validated dimension.
//!
//! ## Purpose
//!
//! This module defines [`Dimension`]: a name, a dimtype, and a labels
//! value. Construction goes through [`Dimension::validate`], which checks
//! the labels' own invariants and the static dimtype↔dimscale
//! compatibility table, so a `Dimension` value is valid by construction.
//!
//! ## Visibility
//!
//! [`Dimension`] is part of the public API.

use crate::model::labels::Labels;
use crate::model::scale::{DimScale, DimType};
use crate::primitives::errors::DemarrayError;

// ============================================================================
// Dimension
// ============================================================================

/// A named, typed, labelled axis of a demographic array.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    dimtype: DimType,
    labels: Labels,
}

impl Dimension {
    /// Validate a dimension against the compatibility table and the labels'
    /// own invariants.
    pub fn validate(
        name: impl Into<String>,
        dimtype: DimType,
        labels: Labels,
    ) -> Result<Dimension, DemarrayError> {
        let name = name.into();
        labels.validate(&name)?;
        let scale = labels.scale();
        if !dimtype.permits(scale) {
            return Err(DemarrayError::IncompatibleDimtype {
                dimension: name,
                dimtype: dimtype.as_str().to_string(),
                detail: format!(
                    "dimscale {} is not permitted (allowed: {})",
                    scale,
                    dimtype
                        .permitted_scales()
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }
        Ok(Dimension {
            name,
            dimtype,
            labels,
        })
    }

    /// Dimension name, unique within an array.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic role.
    pub fn dimtype(&self) -> DimType {
        self.dimtype
    }

    /// Label representation, derived from the labels value.
    pub fn dimscale(&self) -> DimScale {
        self.labels.scale()
    }

    /// The labels value.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dimension has no categories.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Canonical display labels.
    pub fn display_labels(&self) -> Vec<String> {
        self.labels.display()
    }

    /// Same name and dimtype over a new labels value, revalidated.
    pub(crate) fn with_labels(&self, labels: Labels) -> Result<Dimension, DemarrayError> {
        Dimension::validate(self.name.clone(), self.dimtype, labels)
    }

    /// Same labels under a new name, revalidated.
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Result<Dimension, DemarrayError> {
        Dimension::validate(name, self.dimtype, self.labels.clone())
    }
}

//! Subset engine: label-based filtering.
//!
//! ## Purpose
//!
//! This module filters an array to the labels satisfying per-dimension
//! conditions, combined by logical AND across dimensions. A condition is
//! either a small composable [`LabelFilter`] expression over the
//! dimension's own label domain, an explicit retained-label set, or a
//! caller callback from the display-label sequence to the retained index
//! subset; there is no implicit scoped expression evaluation.
//!
//! ## Design notes
//!
//! * Retained labels preserve their original relative order; callback
//!   selections are normalized to that order.
//! * Dimscale-derived fields are recomputed by the labels layer: interval
//!   breakpoints are re-sliced (a gapped interval selection cannot be
//!   represented and fails), iteration draws are renumbered 1..=k.
//! * Filtering a dimension down to nothing is a hard failure
//!   (`EmptyResult`); there is no empty array value.
//! * Numeric range filters read each category's own value domain: points
//!   match by value, intervals by full containment, quantiles by
//!   probability, iterations by draw number.
//!
//! ## Visibility
//!
//! [`Subset`] and [`LabelFilter`] are public API.

use num_traits::Float;

use crate::array::DemographicArray;
use crate::model::dimension::Dimension;
use crate::model::labels::Labels;
use crate::primitives::errors::DemarrayError;

// ============================================================================
// Label Filters
// ============================================================================

/// A composable condition over one dimension's label domain.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelFilter {
    /// Keep categories whose display label is in the set.
    OneOf(Vec<String>),

    /// Keep categories whose value domain lies within the bounds
    /// (inclusive; `None` is unbounded).
    NumericRange {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
    },

    /// Negate a condition.
    Not(Box<LabelFilter>),

    /// Any condition holds.
    AnyOf(Vec<LabelFilter>),

    /// Every condition holds.
    AllOf(Vec<LabelFilter>),
}

impl LabelFilter {
    /// Keep the listed labels.
    pub fn one_of(labels: &[&str]) -> Self {
        LabelFilter::OneOf(labels.iter().map(|s| s.to_string()).collect())
    }

    /// Keep categories at or above `min`.
    pub fn at_least(min: f64) -> Self {
        LabelFilter::NumericRange {
            min: Some(min),
            max: None,
        }
    }

    /// Keep categories at or below `max`.
    pub fn at_most(max: f64) -> Self {
        LabelFilter::NumericRange {
            min: None,
            max: Some(max),
        }
    }

    /// Keep categories within the inclusive bounds.
    pub fn between(min: f64, max: f64) -> Self {
        LabelFilter::NumericRange {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        LabelFilter::Not(Box::new(self))
    }

    /// Whether category `index` of `dim` satisfies the condition.
    fn keeps(&self, dim: &Dimension, index: usize, display: &[String]) -> bool {
        match self {
            LabelFilter::OneOf(labels) => labels.contains(&display[index]),
            LabelFilter::NumericRange { min, max } => {
                let lo = min.unwrap_or(f64::NEG_INFINITY);
                let hi = max.unwrap_or(f64::INFINITY);
                match dim.labels() {
                    Labels::Points(v) => lo <= v[index] && v[index] <= hi,
                    Labels::Intervals(breaks) => {
                        lo <= breaks[index] && breaks[index + 1] <= hi
                    }
                    Labels::Quantiles(v) => lo <= v[index] && v[index] <= hi,
                    Labels::Iterations(_) => {
                        let draw = (index + 1) as f64;
                        lo <= draw && draw <= hi
                    }
                    _ => false,
                }
            }
            LabelFilter::Not(inner) => !inner.keeps(dim, index, display),
            LabelFilter::AnyOf(filters) => filters.iter().any(|f| f.keeps(dim, index, display)),
            LabelFilter::AllOf(filters) => filters.iter().all(|f| f.keeps(dim, index, display)),
        }
    }
}

// ============================================================================
// Subset Builder
// ============================================================================

/// One dimension's condition.
enum DimCondition {
    Expr(LabelFilter),
    Select(Box<dyn Fn(&[String]) -> Vec<usize>>),
}

/// Per-dimension conditions, combined by AND across dimensions.
#[derive(Default)]
pub struct Subset {
    conditions: Vec<(String, DimCondition)>,
}

impl Subset {
    /// An empty subset keeping everything.
    pub fn new() -> Self {
        Subset::default()
    }

    /// Add a filter expression on a dimension.
    pub fn filter(mut self, dim: &str, filter: LabelFilter) -> Self {
        self.conditions
            .push((dim.to_string(), DimCondition::Expr(filter)));
        self
    }

    /// Keep an explicit label set on a dimension.
    pub fn keep(self, dim: &str, labels: &[&str]) -> Self {
        self.filter(dim, LabelFilter::one_of(labels))
    }

    /// Add a callback from the display-label sequence to the retained
    /// index subset. The selection is normalized to original label order.
    pub fn select_with(
        mut self,
        dim: &str,
        select: impl Fn(&[String]) -> Vec<usize> + 'static,
    ) -> Self {
        self.conditions
            .push((dim.to_string(), DimCondition::Select(Box::new(select))));
        self
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Apply the conditions, returning the filtered array.
    pub fn run<T: Float>(
        &self,
        array: &DemographicArray<T>,
    ) -> Result<DemographicArray<T>, DemarrayError> {
        let meta = array.metadata();
        let mut keep: Vec<Vec<usize>> =
            meta.shape().iter().map(|&n| (0..n).collect()).collect();

        for (name, condition) in &self.conditions {
            let pos = meta
                .position(name)
                .ok_or_else(|| DemarrayError::MismatchedDimensions {
                    dimensions: vec![name.clone()],
                    detail: "no dimension with this name".to_string(),
                })?;
            let dim = &meta.dims()[pos];
            let display = dim.display_labels();

            let selected: Vec<usize> = match condition {
                DimCondition::Expr(filter) => (0..dim.len())
                    .filter(|&i| filter.keeps(dim, i, &display))
                    .collect(),
                DimCondition::Select(select) => {
                    let mut indices = select(&display);
                    indices.sort_unstable();
                    indices.dedup();
                    if indices.iter().any(|&i| i >= dim.len()) {
                        return Err(DemarrayError::MismatchedDimensions {
                            dimensions: vec![name.clone()],
                            detail: format!(
                                "selection index out of range for {} categories",
                                dim.len()
                            ),
                        });
                    }
                    indices
                }
            };
            if selected.is_empty() {
                return Err(DemarrayError::EmptyResult {
                    dimension: name.clone(),
                });
            }
            keep[pos].retain(|i| selected.contains(i));
            if keep[pos].is_empty() {
                return Err(DemarrayError::EmptyResult {
                    dimension: name.clone(),
                });
            }
        }

        array.gathered(&keep)
    }
}

impl<T: Float> DemographicArray<T> {
    /// Keep an explicit label set on one dimension.
    pub fn subset(&self, dim: &str, labels: &[&str]) -> Result<Self, DemarrayError> {
        Subset::new().keep(dim, labels).run(self)
    }
}

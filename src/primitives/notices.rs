//! Informational notices for recoverable-by-design situations.
//!
//! ## Purpose
//!
//! This module defines the structured [`Notice`] values that operations
//! attach to their results when they complete successfully but applied an
//! implicit behavior the caller may want to audit: shared-label trimming
//! during alignment, automatic collapsing of extraneous weight dimensions,
//! and the assumed age-interval default during inference.
//!
//! ## Design notes
//!
//! * Notices are values returned alongside results, never console writes,
//!   so tests can assert on them directly.
//! * Each notice names the dimension affected, the operand it applied to
//!   where relevant, and the default applied.
//! * The set of notices emitted by an operation is deterministic; internal
//!   parallelism never changes it (notices are produced in the sequential
//!   metadata phase, before any numeric loop runs).
//! * `Display` renders a one-line human-readable form.
//!
//! ## Visibility
//!
//! [`Notice`] and [`Operand`] are part of the public API; they appear in
//! every operation output that can carry diagnostics.

use std::fmt;

// ============================================================================
// Operand Discriminator
// ============================================================================

/// Which operand of a binary operation a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The left operand (or the value array in a weighted collapse).
    Left,

    /// The right operand.
    Right,

    /// The weights array of a weighted collapse.
    Weights,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Left => write!(f, "left"),
            Operand::Right => write!(f, "right"),
            Operand::Weights => write!(f, "weights"),
        }
    }
}

// ============================================================================
// Notice Values
// ============================================================================

/// A machine-readable record of an implicit behavior applied by an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Inference assumed an Intervals scale for an age dimension labelled
    /// with consecutive single integers, synthesizing the final breakpoint.
    AssumedIntervals {
        /// The age dimension the default was applied to.
        dimension: String,
    },

    /// An operand was subset to the shared-label intersection before an
    /// elementwise operation.
    TrimmedLabels {
        /// The shared dimension that was trimmed.
        dimension: String,
        /// The operand that lost labels.
        operand: Operand,
        /// The labels dropped from that operand, in original order.
        dropped: Vec<String>,
    },

    /// Weight dimensions absent from the value array were summed out before
    /// a weighted collapse.
    CollapsedWeightDimensions {
        /// The weight dimensions that were summed out, in original order.
        dimensions: Vec<String>,
    },
}

impl Notice {
    /// Whether this notice refers to the given dimension.
    pub fn concerns(&self, name: &str) -> bool {
        match self {
            Notice::AssumedIntervals { dimension } | Notice::TrimmedLabels { dimension, .. } => {
                dimension == name
            }
            Notice::CollapsedWeightDimensions { dimensions } => {
                dimensions.iter().any(|d| d == name)
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AssumedIntervals { dimension } => write!(
                f,
                "assumed one-unit intervals for age dimension `{}`",
                dimension
            ),
            Notice::TrimmedLabels {
                dimension,
                operand,
                dropped,
            } => write!(
                f,
                "trimmed {} operand to shared labels on `{}` (dropped {:?})",
                operand, dimension, dropped
            ),
            Notice::CollapsedWeightDimensions { dimensions } => write!(
                f,
                "summed out weight dimensions {:?} absent from the value array",
                dimensions
            ),
        }
    }
}

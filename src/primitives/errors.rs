//! Shared error types for demographic array operations.
//!
//! ## Purpose
//!
//! This module defines the unified [`DemarrayError`] enum covering every
//! failure mode in the crate: label parsing, dimscale inference, metadata
//! validation, and the four operation engines. Every variant carries the
//! offending dimension name(s) so callers can report failures precisely.
//!
//! ## Design notes
//!
//! * One crate-wide enum; fallible functions return `Result<_, DemarrayError>`.
//! * Variants carry structured fields, not pre-rendered strings, except for
//!   the free-form `detail` context.
//! * Dimtype/dimscale names appear as plain strings so this module keeps
//!   zero internal dependencies.
//! * Failures abort the whole operation; there is no partial result. The
//!   recoverable situations (trimming, assumed defaults) are not errors at
//!   all; they surface as notices instead.
//!
//! ## Visibility
//!
//! [`DemarrayError`] is part of the public API and is the error type of the
//! crate-wide `Result` alias.

use thiserror::Error;

// ============================================================================
// Error Enum
// ============================================================================

/// Unified error type for all demographic array operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemarrayError {
    /// Labels could not be parsed against the grammar their dimtype expects.
    #[error("cannot parse labels of dimension `{dimension}`: {detail}")]
    Parse {
        /// Dimension whose labels failed to parse.
        dimension: String,
        /// What was expected and what was found.
        detail: String,
    },

    /// The dimscale could not be inferred and no override was supplied.
    #[error("ambiguous dimscale for dimension `{dimension}`: {detail}")]
    AmbiguousDimscale {
        /// Dimension whose dimscale is ambiguous.
        dimension: String,
        /// Why the labels admit more than one reading.
        detail: String,
    },

    /// A dimension violates the constraints of its dimtype.
    #[error("dimension `{dimension}` violates dimtype `{dimtype}`: {detail}")]
    IncompatibleDimtype {
        /// Offending dimension.
        dimension: String,
        /// The dimtype whose constraint was violated.
        dimtype: String,
        /// The violated constraint.
        detail: String,
    },

    /// A dimension shared by two operands disagrees on dimtype or dimscale.
    #[error(
        "shared dimension `{dimension}` is incompatible between operands: \
         left is {left}, right is {right}"
    )]
    IncompatibleDimscale {
        /// The shared dimension.
        dimension: String,
        /// Left operand's dimtype/dimscale rendering.
        left: String,
        /// Right operand's dimtype/dimscale rendering.
        right: String,
    },

    /// Dimension structure does not line up between operands (or within one).
    #[error("mismatched dimensions {dimensions:?}: {detail}")]
    MismatchedDimensions {
        /// The dimension name(s) involved.
        dimensions: Vec<String>,
        /// What failed to line up.
        detail: String,
    },

    /// Two operands share a dimension but no labels on it.
    #[error("no common labels on shared dimension `{dimension}`")]
    EmptyIntersection {
        /// The shared dimension with an empty label intersection.
        dimension: String,
    },

    /// A values array was aggregated without weights.
    #[error("weights are required: {detail}")]
    MissingWeights {
        /// Which operation required weights and why.
        detail: String,
    },

    /// Binding would break the ordering of an ordered dimension.
    #[error("cannot bind along `{dimension}`: {detail}")]
    NonMonotonicBind {
        /// The along dimension.
        dimension: String,
        /// The ordering violation.
        detail: String,
    },

    /// A subset retained no labels on some dimension.
    #[error("subset of dimension `{dimension}` retains no labels")]
    EmptyResult {
        /// The dimension filtered down to nothing.
        dimension: String,
    },
}

impl DemarrayError {
    /// The name(s) of the dimension(s) this error refers to.
    pub fn dimensions(&self) -> Vec<&str> {
        match self {
            Self::Parse { dimension, .. }
            | Self::AmbiguousDimscale { dimension, .. }
            | Self::IncompatibleDimtype { dimension, .. }
            | Self::IncompatibleDimscale { dimension, .. }
            | Self::EmptyIntersection { dimension }
            | Self::NonMonotonicBind { dimension, .. }
            | Self::EmptyResult { dimension } => vec![dimension.as_str()],
            Self::MismatchedDimensions { dimensions, .. } => {
                dimensions.iter().map(String::as_str).collect()
            }
            Self::MissingWeights { .. } => Vec::new(),
        }
    }
}

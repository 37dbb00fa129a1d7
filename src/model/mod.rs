//! Layer 2: Model
//!
//! The dimension model: semantic dimension metadata and its validation.
//!
//! # Module Organization
//!
//! - **scale**: `DimType`, `DimScale`, and the static compatibility table
//! - **labels**: the `Labels` value, one variant per dimscale
//! - **dimension**: `Dimension` (name + dimtype + labels)
//! - **metadata**: `ArrayMetadata` (the ordered dimension list of an array)
//! - **infer**: label grammars and dimscale inference

/// Dimension types, dimension scales, and their compatibility table.
pub mod scale;

/// Scale-specific label values with canonical formatting.
pub mod labels;

/// A single validated dimension.
pub mod dimension;

/// The ordered dimension list of an array.
pub mod metadata;

/// Dimscale inference from raw label strings.
pub mod infer;

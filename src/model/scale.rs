//! Dimension types, dimension scales, and the static compatibility table.
//!
//! ## Purpose
//!
//! This module defines the semantic role of a dimension ([`DimType`]), the
//! value-domain representation of its labels ([`DimScale`]), and the static
//! table declaring which scales each type permits. The table is a single
//! immutable lookup consulted at dimension construction, not per-call-site
//! logic.
//!
//! ## Key concepts
//!
//! ### Compatibility table
//!
//! ```text
//! age, time                                  -> Points, Intervals
//! cohort                                     -> Intervals
//! triangle                                   -> Triangles
//! sex                                        -> Sexes
//! state, origin, destination, parent, child  -> Categories
//! iterations                                 -> Iterations
//! quantiles                                  -> Quantiles
//! ```
//!
//! ### Paired dimtypes
//!
//! Origin pairs with destination and parent with child; when both members
//! of a pair appear in one array they must carry identical category sets.
//! The pairing relation lives here; the check lives in `metadata`.
//!
//! ## Visibility
//!
//! All types here are part of the public API.

use std::fmt;

// ============================================================================
// DimType
// ============================================================================

/// Semantic role of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimType {
    /// Age of a person or event.
    Age,

    /// Calendar time.
    Time,

    /// Birth cohort.
    Cohort,

    /// Lexis triangle (sub-annual age/time sub-category).
    Triangle,

    /// Sex, exactly the categories female and male.
    Sex,

    /// General classificatory dimension (region, occupation, ...).
    State,

    /// Origin of a move; pairs with [`DimType::Destination`].
    Origin,

    /// Destination of a move; pairs with [`DimType::Origin`].
    Destination,

    /// Parent in a parent/child cross-classification.
    Parent,

    /// Child in a parent/child cross-classification.
    Child,

    /// Simulation draws, labelled 1..=n.
    Iterations,

    /// Distribution summary points, labelled by probability.
    Quantiles,
}

impl DimType {
    /// The dimscales this dimtype permits, per the static table.
    pub fn permitted_scales(&self) -> &'static [DimScale] {
        match self {
            DimType::Age | DimType::Time => &[DimScale::Points, DimScale::Intervals],
            DimType::Cohort => &[DimScale::Intervals],
            DimType::Triangle => &[DimScale::Triangles],
            DimType::Sex => &[DimScale::Sexes],
            DimType::State
            | DimType::Origin
            | DimType::Destination
            | DimType::Parent
            | DimType::Child => &[DimScale::Categories],
            DimType::Iterations => &[DimScale::Iterations],
            DimType::Quantiles => &[DimScale::Quantiles],
        }
    }

    /// Whether the table permits `scale` for this dimtype.
    pub fn permits(&self, scale: DimScale) -> bool {
        self.permitted_scales().contains(&scale)
    }

    /// The dimtype this one is paired with, if any.
    pub fn paired_with(&self) -> Option<DimType> {
        match self {
            DimType::Origin => Some(DimType::Destination),
            DimType::Destination => Some(DimType::Origin),
            DimType::Parent => Some(DimType::Child),
            DimType::Child => Some(DimType::Parent),
            _ => None,
        }
    }

    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            DimType::Age => "age",
            DimType::Time => "time",
            DimType::Cohort => "cohort",
            DimType::Triangle => "triangle",
            DimType::Sex => "sex",
            DimType::State => "state",
            DimType::Origin => "origin",
            DimType::Destination => "destination",
            DimType::Parent => "parent",
            DimType::Child => "child",
            DimType::Iterations => "iterations",
            DimType::Quantiles => "quantiles",
        }
    }
}

impl fmt::Display for DimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DimScale
// ============================================================================

/// Value-domain representation of a dimension's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimScale {
    /// Strictly increasing scalar points.
    Points,

    /// Contiguous half-open intervals given by breakpoints.
    Intervals,

    /// Lexis triangles.
    Triangles,

    /// The sexes.
    Sexes,

    /// Unordered distinct categories.
    Categories,

    /// Simulation draws 1..=n.
    Iterations,

    /// Probabilities in (0, 1).
    Quantiles,
}

impl DimScale {
    /// Name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            DimScale::Points => "Points",
            DimScale::Intervals => "Intervals",
            DimScale::Triangles => "Triangles",
            DimScale::Sexes => "Sexes",
            DimScale::Categories => "Categories",
            DimScale::Iterations => "Iterations",
            DimScale::Quantiles => "Quantiles",
        }
    }
}

impl fmt::Display for DimScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Canonical Tokens
// ============================================================================

/// The two sex categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Female.
    Female,

    /// Male.
    Male,
}

impl Sex {
    /// Parse a raw label, case-normalized.
    pub fn parse(raw: &str) -> Option<Sex> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "female" => Some(Sex::Female),
            "male" => Some(Sex::Male),
            _ => None,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// The two canonical Lexis triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Triangle {
    /// Lower triangle: the event cohort reached the age within the period.
    Lower,

    /// Upper triangle: the event cohort entered the period at the age.
    Upper,
}

impl Triangle {
    /// Parse a raw label, case-normalized.
    pub fn parse(raw: &str) -> Option<Triangle> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lower" => Some(Triangle::Lower),
            "upper" => Some(Triangle::Upper),
            _ => None,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Triangle::Lower => "Lower",
            Triangle::Upper => "Upper",
        }
    }
}

//! Interop coercions: untyped labelled buffers and long-format tables.
//!
//! ## Purpose
//!
//! This module implements the external coercion contract: a demographic
//! array converts to and from a generic untyped N-dimensional
//! buffer-with-labels ([`LabeledArray`]; the conversion adds or drops
//! only the {dimtype, dimscale} pair), and exports to a long-format
//! relational table ([`LongTable`], one row per cell), optionally
//! substituting each Intervals/Points category with its computed midpoint
//! scalar.
//!
//! ## Design notes
//!
//! * Conversions are thin shells around the core: no aggregation, no
//!   reshaping, no I/O. Cross-tabulation of raw relational sources into
//!   the array shape is an external collaborator's job.
//! * `from_labeled` runs dimscale inference with caller-supplied dimtypes
//!   (and optional per-dimension dimscale overrides), so the round-trip
//!   through `to_labeled` restores equivalent metadata for canonical
//!   labels.
//! * Long-table rows enumerate cells in row-major order; midpoint mode
//!   yields numeric cells for Points/Intervals dimensions and text cells
//!   for everything else.
//!
//! ## Non-goals
//!
//! * No file or data-frame serialization; both shapes are in-process
//!   values handed to external collaborators.
//!
//! ## Visibility
//!
//! All types here are part of the public API.

use std::fmt;

use num_traits::Float;

use crate::array::{ArrayKind, DemographicArray};
use crate::model::infer::infer_dimension;
use crate::model::metadata::ArrayMetadata;
use crate::model::scale::{DimScale, DimType};
use crate::primitives::errors::DemarrayError;
use crate::primitives::layout;
use crate::primitives::notices::Notice;

// ============================================================================
// Labeled Array
// ============================================================================

/// A generic untyped N-dimensional buffer with per-axis labels: the shape
/// external collaborators exchange, carrying no demographic semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray<T> {
    /// Axis names, in buffer order.
    pub dim_names: Vec<String>,

    /// Display labels per axis, in buffer order.
    pub labels: Vec<Vec<String>>,

    /// Row-major buffer.
    pub data: Vec<T>,
}

impl<T: Float> DemographicArray<T> {
    /// Drop the {dimtype, dimscale} pair, keeping names, display labels,
    /// and the buffer.
    pub fn to_labeled(&self) -> LabeledArray<T> {
        LabeledArray {
            dim_names: self
                .metadata()
                .names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            labels: self
                .metadata()
                .dims()
                .iter()
                .map(|d| d.display_labels())
                .collect(),
            data: self.data().to_vec(),
        }
    }

    /// Add the {dimtype, dimscale} pair back onto an untyped labelled
    /// buffer by running dimscale inference per axis.
    ///
    /// `types` supplies, per axis in buffer order, the dimtype and an
    /// optional dimscale override.
    pub fn from_labeled(
        labeled: &LabeledArray<T>,
        types: &[(DimType, Option<DimScale>)],
        kind: ArrayKind,
    ) -> Result<(Self, Vec<Notice>), DemarrayError> {
        if types.len() != labeled.dim_names.len() || labeled.labels.len() != labeled.dim_names.len()
        {
            return Err(DemarrayError::MismatchedDimensions {
                dimensions: labeled.dim_names.clone(),
                detail: format!(
                    "{} axes, {} label sequences, {} dimtype assignments",
                    labeled.dim_names.len(),
                    labeled.labels.len(),
                    types.len()
                ),
            });
        }
        let mut dims = Vec::with_capacity(types.len());
        let mut notices = Vec::new();
        for ((name, raw), &(dimtype, scale)) in labeled
            .dim_names
            .iter()
            .zip(&labeled.labels)
            .zip(types)
        {
            let inferred = infer_dimension(name.clone(), dimtype, raw, scale)?;
            notices.extend(inferred.notices);
            dims.push(inferred.dimension);
        }
        let array = DemographicArray::new(kind, ArrayMetadata::new(dims)?, labeled.data.clone())?;
        Ok((array, notices))
    }
}

// ============================================================================
// Long Table
// ============================================================================

/// One cell of a long-format row: a category label or a midpoint scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A category's display label.
    Text(String),

    /// A computed midpoint scalar for a Points/Intervals category.
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(x) => write!(f, "{}", x),
        }
    }
}

/// One row of a long-format table: one cell per dimension plus the measure.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow<T> {
    /// Dimension cells, in column order.
    pub cells: Vec<Cell>,

    /// The measure for this combination of categories.
    pub value: T,
}

/// A long-format relational view of an array: one row per buffer cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable<T> {
    /// Dimension column names, in array dimension order.
    pub columns: Vec<String>,

    /// Whether the measure column holds counts or values.
    pub kind: ArrayKind,

    /// Rows in row-major cell order.
    pub rows: Vec<LongRow<T>>,
}

impl<T: Float> DemographicArray<T> {
    /// Export to long format, one row per cell.
    ///
    /// With `midpoints`, each Intervals/Points category cell is replaced
    /// by its computed midpoint scalar; other scales keep their labels.
    pub fn to_long(&self, midpoints: bool) -> LongTable<T> {
        let dims = self.metadata().dims();
        let per_dim: Vec<Vec<Cell>> = dims
            .iter()
            .map(|d| {
                let mids = if midpoints { d.labels().midpoints() } else { None };
                match mids {
                    Some(mids) => mids.into_iter().map(Cell::Number).collect(),
                    None => d.display_labels().into_iter().map(Cell::Text).collect(),
                }
            })
            .collect();

        let shape = self.shape();
        let rows = self
            .data()
            .iter()
            .enumerate()
            .map(|(flat, &value)| {
                let index = layout::unravel(flat, &shape);
                LongRow {
                    cells: index
                        .iter()
                        .zip(&per_dim)
                        .map(|(&i, cells)| cells[i].clone())
                        .collect(),
                    value,
                }
            })
            .collect();

        LongTable {
            columns: self
                .metadata()
                .names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            kind: self.kind(),
            rows,
        }
    }
}

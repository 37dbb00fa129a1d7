//! Alignment engine: shared-dimension reconciliation and arithmetic.
//!
//! ## Purpose
//!
//! This module reconciles two arrays' shared dimensions before an
//! elementwise binary operation and applies the operator over the
//! conformant buffers. Reconciliation checks dimtype/dimscale agreement,
//! intersects shared labels (trimming operands with a notice, or failing
//! under the strict policy), drops cardinality-1 dimensions present in
//! only one operand, and permutes both operands to a canonical order.
//!
//! ## Design notes
//!
//! * The canonical order is the left operand's declared order over the
//!   shared dimensions; the right operand is permuted to match.
//! * Label intersection order is taken from the left operand; a right
//!   operand whose labels merely differ in order is reordered without a
//!   notice (no labels were dropped).
//! * Trimming is recoverable-by-design: it succeeds and attaches one
//!   [`Notice::TrimmedLabels`] per trimmed operand. `AlignPolicy::Strict`
//!   turns any would-be trim into a hard failure for callers requiring
//!   exactness.
//! * The elementwise pass runs under rayon when the result is large
//!   enough; results and notices are identical to sequential execution
//!   (notices are produced before any numeric loop runs).
//! * The reconciliation helper is shared with the collapse engine, which
//!   reconciles a value array against its weights the same way.
//!
//! ## Key concepts
//!
//! ### Result kind
//!
//! Counts ⊕ Counts stays Counts for ⊕ ∈ {+, −, ×}; Counts ÷ Counts is a
//! rate, hence Values; any Values operand makes the result Values.
//!
//! ## Invariants
//!
//! * Both conformed operands have identical metadata (same dimensions,
//!   same labels, same order) when the operator is applied.
//! * A dimension present in exactly one operand never reaches the
//!   elementwise pass: it is dropped (cardinality 1) or rejected.
//!
//! ## Visibility
//!
//! [`arith`], [`Operator`], and [`AlignPolicy`] are public API; the
//! conform helper is crate-internal.

use num_traits::Float;
use rayon::prelude::*;

use crate::array::{ArrayKind, ArrayOutput, DemographicArray};
use crate::engine::PAR_THRESHOLD;
use crate::model::metadata::ArrayMetadata;
use crate::primitives::errors::DemarrayError;
use crate::primitives::notices::{Notice, Operand};

// ============================================================================
// Operator and Policy
// ============================================================================

/// Elementwise binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Addition.
    Add,

    /// Subtraction.
    Sub,

    /// Multiplication.
    Mul,

    /// Division.
    Div,
}

impl Operator {
    /// Apply to one pair of cells.
    #[inline]
    pub fn apply<T: Float>(&self, a: T, b: T) -> T {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
        }
    }
}

/// How alignment treats shared labels that do not fully agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignPolicy {
    /// Trim both operands to the shared-label intersection, with a notice
    /// per trimmed operand.
    #[default]
    Trim,

    /// Fail instead of trimming.
    Strict,
}

// ============================================================================
// Arithmetic Entry Point
// ============================================================================

/// Align two arrays and apply an elementwise operator.
pub fn arith<T: Float + Send + Sync>(
    a: &DemographicArray<T>,
    b: &DemographicArray<T>,
    op: Operator,
    policy: AlignPolicy,
) -> Result<ArrayOutput<T>, DemarrayError> {
    let (left, right, notices) = conform(a, b, policy, Operand::Left, Operand::Right)?;

    let la = left.data();
    let rb = right.data();
    let data: Vec<T> = if la.len() >= PAR_THRESHOLD {
        la.par_iter()
            .zip(rb.par_iter())
            .map(|(&x, &y)| op.apply(x, y))
            .collect()
    } else {
        la.iter()
            .zip(rb.iter())
            .map(|(&x, &y)| op.apply(x, y))
            .collect()
    };

    let kind = result_kind(a.kind(), b.kind(), op);
    Ok(ArrayOutput {
        array: DemographicArray::from_parts(kind, left.metadata().clone(), data),
        notices,
    })
}

/// The Counts/Values tag of an arithmetic result.
fn result_kind(a: ArrayKind, b: ArrayKind, op: Operator) -> ArrayKind {
    match (a, b, op) {
        (ArrayKind::Counts, ArrayKind::Counts, Operator::Div) => ArrayKind::Values,
        (ArrayKind::Counts, ArrayKind::Counts, _) => ArrayKind::Counts,
        _ => ArrayKind::Values,
    }
}

// ============================================================================
// Convenience Methods
// ============================================================================

impl<T: Float + Send + Sync> DemographicArray<T> {
    /// Elementwise addition under the trimming policy.
    pub fn add(&self, rhs: &Self) -> Result<ArrayOutput<T>, DemarrayError> {
        arith(self, rhs, Operator::Add, AlignPolicy::Trim)
    }

    /// Elementwise subtraction under the trimming policy.
    pub fn sub(&self, rhs: &Self) -> Result<ArrayOutput<T>, DemarrayError> {
        arith(self, rhs, Operator::Sub, AlignPolicy::Trim)
    }

    /// Elementwise multiplication under the trimming policy.
    pub fn mul(&self, rhs: &Self) -> Result<ArrayOutput<T>, DemarrayError> {
        arith(self, rhs, Operator::Mul, AlignPolicy::Trim)
    }

    /// Elementwise division under the trimming policy.
    pub fn div(&self, rhs: &Self) -> Result<ArrayOutput<T>, DemarrayError> {
        arith(self, rhs, Operator::Div, AlignPolicy::Trim)
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Reconcile two arrays to identical metadata: scale-check shared
/// dimensions, intersect labels (trimming with notices under `Trim`),
/// drop cardinality-1 dimensions present in only one operand, and permute
/// the right operand to the left's order.
pub(crate) fn conform<T: Float>(
    a: &DemographicArray<T>,
    b: &DemographicArray<T>,
    policy: AlignPolicy,
    left_op: Operand,
    right_op: Operand,
) -> Result<(DemographicArray<T>, DemographicArray<T>, Vec<Notice>), DemarrayError> {
    let a_meta = a.metadata();
    let b_meta = b.metadata();

    // Step 1: shared dimensions agree on dimtype and dimscale.
    let shared: Vec<String> = a_meta
        .names()
        .iter()
        .filter(|n| b_meta.position(n).is_some())
        .map(|n| n.to_string())
        .collect();
    for name in &shared {
        let da = a_meta.dim(name).expect("shared name resolves in left");
        let db = b_meta.dim(name).expect("shared name resolves in right");
        if da.dimtype() != db.dimtype() || da.dimscale() != db.dimscale() {
            return Err(DemarrayError::IncompatibleDimscale {
                dimension: name.clone(),
                left: format!("{}/{}", da.dimtype(), da.dimscale()),
                right: format!("{}/{}", db.dimtype(), db.dimscale()),
            });
        }
    }

    // Step 3: a dimension in exactly one operand must have cardinality 1.
    let a_only = droppable_extras(a_meta, b_meta, "left")?;
    let b_only = droppable_extras(b_meta, a_meta, "right")?;

    // Step 2: ordered label intersection per shared dimension.
    let mut notices = Vec::new();
    let mut keep_a: Vec<Vec<usize>> = a_meta.shape().iter().map(|&n| (0..n).collect()).collect();
    let mut keep_b: Vec<Vec<usize>> = b_meta.shape().iter().map(|&n| (0..n).collect()).collect();

    for name in &shared {
        let pa = a_meta.position(name).expect("shared name resolves in left");
        let pb = b_meta.position(name).expect("shared name resolves in right");
        let la = a_meta.dims()[pa].display_labels();
        let lb = b_meta.dims()[pb].display_labels();

        let a_idx: Vec<usize> = (0..la.len()).filter(|&i| lb.contains(&la[i])).collect();
        if a_idx.is_empty() {
            return Err(DemarrayError::EmptyIntersection {
                dimension: name.clone(),
            });
        }
        // Right indices follow the intersection in the left operand's order.
        let b_idx: Vec<usize> = a_idx
            .iter()
            .map(|&i| lb.iter().position(|l| *l == la[i]).expect("label in both"))
            .collect();

        let mut trim = |full: &[String], kept: &[usize], operand: Operand| {
            if kept.len() < full.len() {
                notices.push(Notice::TrimmedLabels {
                    dimension: name.clone(),
                    operand,
                    dropped: (0..full.len())
                        .filter(|i| !kept.contains(i))
                        .map(|i| full[i].clone())
                        .collect(),
                });
                true
            } else {
                false
            }
        };
        let trimmed_left = trim(&la, &a_idx, left_op);
        let mut sorted_b = b_idx.clone();
        sorted_b.sort_unstable();
        let trimmed_right = trim(&lb, &sorted_b, right_op);

        if policy == AlignPolicy::Strict && (trimmed_left || trimmed_right) {
            return Err(DemarrayError::MismatchedDimensions {
                dimensions: vec![name.clone()],
                detail: "label sets differ and the strict policy forbids trimming".to_string(),
            });
        }

        keep_a[pa] = a_idx;
        keep_b[pb] = b_idx;
    }

    // Steps 2+3 materialize: gather, then drop the cardinality-1 extras
    // (removing a size-1 axis leaves the buffer untouched).
    let left = drop_axes(a.gathered(&keep_a)?, &a_only);
    let right = drop_axes(b.gathered(&keep_b)?, &b_only);

    // Step 4: permute the right operand to the left's declared order.
    let left_names = left.metadata().names();
    let right = right.permuted_by_names(&left_names)?;

    Ok((left, right, notices))
}

/// Positions of dimensions present only in `meta`, each required to have
/// cardinality 1 so it can be dropped from consideration.
fn droppable_extras(
    meta: &ArrayMetadata,
    other: &ArrayMetadata,
    side: &str,
) -> Result<Vec<usize>, DemarrayError> {
    let mut positions = Vec::new();
    for (i, d) in meta.dims().iter().enumerate() {
        if other.position(d.name()).is_none() {
            if d.len() != 1 {
                return Err(DemarrayError::MismatchedDimensions {
                    dimensions: vec![d.name().to_string()],
                    detail: format!(
                        "present only in the {} operand with {} categories",
                        side,
                        d.len()
                    ),
                });
            }
            positions.push(i);
        }
    }
    Ok(positions)
}

/// Remove cardinality-1 axes; metadata-only, the buffer is unchanged.
fn drop_axes<T: Float>(array: DemographicArray<T>, positions: &[usize]) -> DemographicArray<T> {
    if positions.is_empty() {
        return array;
    }
    let metadata = array.metadata().without(positions);
    DemographicArray::from_parts(array.kind(), metadata, array.data().to_vec())
}

//! Bind engine: concatenation of arrays along one dimension.
//!
//! ## Purpose
//!
//! This module concatenates two or more arrays that share every dimension
//! except one designated "along" dimension. Non-along dimensions must
//! carry identical label sequences; the along dimension's labels are
//! concatenated in the caller-supplied operand order.
//!
//! ## Design notes
//!
//! * Operands are permuted to the first operand's dimension order before
//!   concatenation; the output keeps that order.
//! * Categories-like along scales require pairwise-disjoint labels;
//!   Points require the concatenated sequence strictly increasing;
//!   Intervals additionally require exact boundary chaining; a gap would
//!   silently fabricate a phantom interval.
//! * The buffer concatenation permutes each operand so the along axis is
//!   slowest-varying, appends the buffers, and permutes back: slices along
//!   the leading axis are contiguous in row-major layout.
//!
//! ## Invariants
//!
//! * All operands have the same Counts/Values tag, which the output keeps.
//! * The output along dimension's label sequence is the ordered
//!   concatenation of the operands'.
//!
//! ## Visibility
//!
//! [`bind`] is public API.

use num_traits::Float;

use crate::array::DemographicArray;
use crate::model::labels::Labels;
use crate::model::scale::DimScale;
use crate::primitives::errors::DemarrayError;
use crate::primitives::layout;

// ============================================================================
// Bind Entry Point
// ============================================================================

/// Concatenate arrays along the named dimension.
pub fn bind<T: Float>(
    operands: &[&DemographicArray<T>],
    along: &str,
) -> Result<DemographicArray<T>, DemarrayError> {
    let mismatch = |dimensions: Vec<String>, detail: String| DemarrayError::MismatchedDimensions {
        dimensions,
        detail,
    };

    if operands.len() < 2 {
        return Err(mismatch(
            vec![along.to_string()],
            format!("binding needs at least 2 operands, got {}", operands.len()),
        ));
    }
    let first = operands[0];
    if operands.iter().any(|a| a.kind() != first.kind()) {
        return Err(mismatch(
            vec![along.to_string()],
            "operands mix counts and values arrays".to_string(),
        ));
    }

    let along_pos = first
        .metadata()
        .position(along)
        .ok_or_else(|| mismatch(vec![along.to_string()], "no dimension with this name".to_string()))?;
    let along_dim = &first.metadata().dims()[along_pos];

    // Every operand shares every dimension; permute to the first's order.
    let first_names = first.metadata().names();
    let mut permuted = Vec::with_capacity(operands.len());
    for other in operands {
        if other.metadata().ndim() != first.metadata().ndim() {
            return Err(mismatch(
                other.metadata().names().iter().map(|s| s.to_string()).collect(),
                "operands declare different dimension sets".to_string(),
            ));
        }
        permuted.push(other.permuted_by_names(&first_names)?);
    }

    // Non-along dimensions agree exactly; the along dimension agrees on
    // dimtype and dimscale.
    for other in &permuted {
        for (da, db) in first.metadata().dims().iter().zip(other.metadata().dims()) {
            if da.dimtype() != db.dimtype() || da.dimscale() != db.dimscale() {
                return Err(DemarrayError::IncompatibleDimscale {
                    dimension: da.name().to_string(),
                    left: format!("{}/{}", da.dimtype(), da.dimscale()),
                    right: format!("{}/{}", db.dimtype(), db.dimscale()),
                });
            }
            if da.name() != along && da.labels() != db.labels() {
                return Err(mismatch(
                    vec![da.name().to_string()],
                    "non-along dimension labels differ between operands".to_string(),
                ));
            }
        }
    }

    // Concatenate the along labels in operand order.
    let along_labels = concat_along_labels(
        along,
        &permuted
            .iter()
            .map(|a| a.metadata().dims()[along_pos].labels().clone())
            .collect::<Vec<_>>(),
    )?;
    let along_dim = along_dim.with_labels(along_labels)?;

    // Concatenate buffers with the along axis leading.
    let ndim = first.metadata().ndim();
    let mut lead_order: Vec<usize> = Vec::with_capacity(ndim);
    lead_order.push(along_pos);
    lead_order.extend((0..ndim).filter(|&d| d != along_pos));

    let mut data = Vec::new();
    for a in &permuted {
        data.extend_from_slice(a.permuted(&lead_order).data());
    }

    // Undo the leading permutation on the combined buffer.
    let mut lead_shape: Vec<usize> = Vec::with_capacity(ndim);
    lead_shape.push(along_dim.len());
    lead_shape.extend(
        (0..ndim)
            .filter(|&d| d != along_pos)
            .map(|d| first.metadata().dims()[d].len()),
    );
    let data = layout::permute_axes(&data, &lead_shape, &layout::inverse_order(&lead_order));

    let metadata = first.metadata().replaced(along_pos, along_dim)?;
    DemographicArray::new(first.kind(), metadata, data)
}

// ============================================================================
// Along-Label Concatenation
// ============================================================================

/// Concatenate along-dimension labels, enforcing the per-scale ordering
/// rules.
fn concat_along_labels(along: &str, labels: &[Labels]) -> Result<Labels, DemarrayError> {
    let monotonic = |detail: String| DemarrayError::NonMonotonicBind {
        dimension: along.to_string(),
        detail,
    };

    match labels[0].scale() {
        DimScale::Points => {
            let mut points = Vec::new();
            for l in labels {
                if let Labels::Points(v) = l {
                    points.extend_from_slice(v);
                }
            }
            if points.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(monotonic(
                    "concatenated points are not strictly increasing".to_string(),
                ));
            }
            Ok(Labels::Points(points))
        }
        DimScale::Intervals => {
            let mut breaks: Vec<f64> = Vec::new();
            for l in labels {
                if let Labels::Intervals(b) = l {
                    match breaks.last() {
                        None => breaks.extend_from_slice(b),
                        Some(&last) => {
                            if last != b[0] {
                                return Err(monotonic(format!(
                                    "operand intervals do not chain: previous upper bound is \
                                     {}, next lower bound is {}",
                                    last, b[0]
                                )));
                            }
                            breaks.extend_from_slice(&b[1..]);
                        }
                    }
                }
            }
            Ok(Labels::Intervals(breaks))
        }
        DimScale::Categories | DimScale::Sexes | DimScale::Triangles | DimScale::Iterations
        | DimScale::Quantiles => {
            // Categories-like scales concatenate display labels and demand
            // pairwise disjointness; Quantiles additionally reduce to the
            // Points rule via their probabilities.
            if let Labels::Quantiles(_) = labels[0] {
                let mut probs = Vec::new();
                for l in labels {
                    if let Labels::Quantiles(v) = l {
                        probs.extend_from_slice(v);
                    }
                }
                if probs.windows(2).any(|w| !(w[0] < w[1])) {
                    return Err(monotonic(
                        "concatenated probabilities are not strictly increasing".to_string(),
                    ));
                }
                return Ok(Labels::Quantiles(probs));
            }

            let mut seen: Vec<String> = Vec::new();
            for l in labels {
                for label in l.display() {
                    if seen.contains(&label) {
                        return Err(DemarrayError::MismatchedDimensions {
                            dimensions: vec![along.to_string()],
                            detail: format!("label `{}` appears in more than one operand", label),
                        });
                    }
                    seen.push(label);
                }
            }
            match labels[0] {
                Labels::Categories(_) => Ok(Labels::Categories(seen)),
                Labels::Sexes(_) => {
                    let mut sexes = Vec::new();
                    for l in labels {
                        if let Labels::Sexes(v) = l {
                            sexes.extend_from_slice(v);
                        }
                    }
                    Ok(Labels::Sexes(sexes))
                }
                Labels::Triangles(_) => {
                    let mut tris = Vec::new();
                    for l in labels {
                        if let Labels::Triangles(v) = l {
                            tris.extend_from_slice(v);
                        }
                    }
                    Ok(Labels::Triangles(tris))
                }
                // Iterations always overlap (both start at 1), so the
                // disjointness check above has already rejected them.
                _ => unreachable!("scale handled above"),
            }
        }
    }
}

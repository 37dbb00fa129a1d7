//! Row-major layout arithmetic for dense N-dimensional buffers.
//!
//! ## Purpose
//!
//! This module provides the stride math every engine relies on: computing
//! row-major strides, converting between flat offsets and multi-indices,
//! selecting sub-buffers by per-dimension index lists (gather), and
//! permuting axes. All functions operate on plain slices; the metadata
//! layer decides what the dimensions mean.
//!
//! ## Design notes
//!
//! * Layout is always row-major: the last dimension varies fastest.
//! * `selected_offsets` is the shared workhorse: gather, permutation, and
//!   the collapse engines are all cartesian sums of per-dimension offset
//!   lists, enumerated in row-major order.
//! * An empty dimension list denotes the scalar shape: one element, offset 0.
//! * Functions here do not validate against metadata; callers pass index
//!   lists they have already bounds-checked.
//!
//! ## Invariants
//!
//! * `strides(shape)[last] == 1` for non-empty shapes.
//! * `element_count(shape) == shape.iter().product()`.
//! * `selected_offsets` output length is the product of the list lengths.
//!
//! ## Non-goals
//!
//! * No bounds checking beyond slice indexing.
//! * No views or lazy evaluation; every operation materializes a buffer.
//!
//! ## Visibility
//!
//! Internal utility layer; not re-exported from the crate root.

// ============================================================================
// Strides and Index Conversion
// ============================================================================

/// Row-major strides for a shape.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut out = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        out[d] = out[d + 1] * shape[d + 1];
    }
    out
}

/// Number of elements addressed by a shape (1 for the scalar shape).
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Flat offset of a multi-index under the given strides.
pub fn offset(index: &[usize], strides: &[usize]) -> usize {
    index.iter().zip(strides).map(|(i, s)| i * s).sum()
}

/// Multi-index of a flat offset within a shape.
pub fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut out = vec![0; shape.len()];
    for d in (0..shape.len()).rev() {
        out[d] = flat % shape[d];
        flat /= shape[d];
    }
    out
}

// ============================================================================
// Cartesian Offset Enumeration
// ============================================================================

/// All cartesian sums of the per-dimension offset lists, in row-major order
/// over the lists.
///
/// Gather, axis permutation, and margin iteration are all instances of this:
/// the caller maps each retained index of dimension `d` to `index * stride_d`
/// and this function enumerates every cell of the selection.
pub fn selected_offsets(per_dim: &[Vec<usize>]) -> Vec<usize> {
    let mut out = vec![0usize];
    for dim in per_dim {
        let mut next = Vec::with_capacity(out.len() * dim.len());
        for &base in &out {
            for &o in dim {
                next.push(base + o);
            }
        }
        out = next;
    }
    out
}

/// Offset lists for full axes: dimension `d` contributes `0..shape[d]`
/// scaled by its stride.
pub fn full_axis_offsets(shape: &[usize], strides: &[usize], axes: &[usize]) -> Vec<Vec<usize>> {
    axes.iter()
        .map(|&d| (0..shape[d]).map(|k| k * strides[d]).collect())
        .collect()
}

// ============================================================================
// Gather and Permutation
// ============================================================================

/// Select `keep[d]` indices along each dimension, materializing the
/// sub-buffer in row-major order.
pub fn gather<T: Copy>(data: &[T], shape: &[usize], keep: &[Vec<usize>]) -> Vec<T> {
    debug_assert_eq!(shape.len(), keep.len());
    let s = strides(shape);
    let per: Vec<Vec<usize>> = keep
        .iter()
        .enumerate()
        .map(|(d, idx)| idx.iter().map(|&k| k * s[d]).collect())
        .collect();
    selected_offsets(&per).iter().map(|&o| data[o]).collect()
}

/// Reorder axes so that new dimension `i` is old dimension `order[i]`.
pub fn permute_axes<T: Copy>(data: &[T], shape: &[usize], order: &[usize]) -> Vec<T> {
    debug_assert_eq!(shape.len(), order.len());
    let s = strides(shape);
    let per = full_axis_offsets(shape, &s, order);
    selected_offsets(&per).iter().map(|&o| data[o]).collect()
}

/// The permutation that undoes `order`.
pub fn inverse_order(order: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; order.len()];
    for (new_pos, &old_pos) in order.iter().enumerate() {
        inv[old_pos] = new_pos;
    }
    inv
}

//! Collapse engine: dimension reduction with and without weights.
//!
//! ## Purpose
//!
//! This module removes dimensions from an array. Counts collapse by
//! summation (or unweighted mean); Values require a Counts weights array
//! and collapse by weighted mean. It also regroups an Intervals dimension
//! onto coarser breakpoints and summarizes an Iterations dimension into
//! quantiles or named summary statistics.
//!
//! ## Design notes
//!
//! * Configuration goes through the [`Collapse`] builder: name either the
//!   dimensions to drop or the margin to retain, then `run`.
//! * Weight reconciliation reuses the alignment engine's trimming rule:
//!   weight dimensions absent from the value array are summed out first
//!   (with a notice), the dimension sets must then match, and shared
//!   labels are intersected with per-operand trim notices.
//! * A retained cell whose total weight is zero yields NaN, an explicit
//!   undefined value, never a silent 0.
//! * The accumulation loop over retained multi-indices runs under rayon
//!   for large results; dropped-axis offsets are precomputed so each
//!   retained cell's reduction is independent.
//! * Weights are consulted only for Values arrays; a Counts collapse is a
//!   plain sum over cardinalities and ignores the weights configuration.
//!
//! ## Key concepts
//!
//! ### Interval regrouping
//!
//! New breakpoints must be a subsequence of the existing ones sharing the
//! first and last breakpoint, so every new bin subsumes a whole run of old
//! bins. Each new bin aggregates its old bins by the same sum or
//! weighted-mean rule.
//!
//! ### Iteration collapsing
//!
//! An Iterations dimension is replaced wholesale: by a Quantiles dimension
//! (type-7 interpolation between order statistics of the draws) or by a
//! Categories dimension holding one named summary per caller-supplied
//! function. The Counts/Values tag of the array is unchanged.
//!
//! ## Invariants
//!
//! * Retained dimensions keep their original relative order.
//! * Collapsing every dimension yields the scalar array (zero dimensions,
//!   one element).
//!
//! ## Visibility
//!
//! [`Collapse`], [`Aggregator`], [`regroup_intervals`],
//! [`collapse_iterations`], and [`IterationCollapse`] are public API.

use num_traits::Float;
use rayon::prelude::*;

use crate::array::{ArrayOutput, DemographicArray};
use crate::engine::align::{conform, AlignPolicy};
use crate::engine::PAR_THRESHOLD;
use crate::model::dimension::Dimension;
use crate::model::labels::Labels;
use crate::model::scale::{DimScale, DimType};
use crate::primitives::errors::DemarrayError;
use crate::primitives::layout;
use crate::primitives::notices::{Notice, Operand};

// ============================================================================
// Aggregator
// ============================================================================

/// Unweighted aggregation rule for Counts arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregator {
    /// Sum the dropped cells (the Counts default).
    #[default]
    Sum,

    /// Unweighted arithmetic mean of the dropped cells.
    Mean,
}

// ============================================================================
// Collapse Builder
// ============================================================================

/// Configuration for a collapse: which dimensions go, and how.
#[derive(Debug, Clone)]
pub struct Collapse<'w, T> {
    drop: Vec<String>,
    keep: Option<Vec<String>>,
    weights: Option<&'w DemographicArray<T>>,
    aggregator: Aggregator,
}

impl<'w, T: Float + Send + Sync> Collapse<'w, T> {
    /// Collapse the named dimensions out of the array.
    pub fn drop_dims(dims: &[&str]) -> Self {
        Collapse {
            drop: dims.iter().map(|s| s.to_string()).collect(),
            keep: None,
            weights: None,
            aggregator: Aggregator::default(),
        }
    }

    /// Retain exactly the named margin, collapsing everything else.
    pub fn keep_margin(dims: &[&str]) -> Self {
        Collapse {
            drop: Vec::new(),
            keep: Some(dims.iter().map(|s| s.to_string()).collect()),
            weights: None,
            aggregator: Aggregator::default(),
        }
    }

    /// Supply the Counts weights a Values collapse requires.
    pub fn weights(mut self, weights: &'w DemographicArray<T>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Override the unweighted aggregation rule (Counts arrays only).
    pub fn aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Collapse the array, returning the reduced array plus notices.
    pub fn run(&self, array: &DemographicArray<T>) -> Result<ArrayOutput<T>, DemarrayError> {
        let dropped = self.resolve_dropped(array)?;
        if dropped.is_empty() {
            return Ok(ArrayOutput::clean(array.clone()));
        }

        if array.is_counts() {
            let data = reduce_sum(array, &dropped, self.aggregator);
            let metadata = array.metadata().without(&dropped);
            return Ok(ArrayOutput::clean(DemographicArray::from_parts(
                array.kind(),
                metadata,
                data,
            )));
        }

        // Values: weighted mean over the dropped cells.
        let weights = self.weights.ok_or_else(|| DemarrayError::MissingWeights {
            detail: "collapsing a values array requires a counts weights array".to_string(),
        })?;
        if !weights.is_counts() {
            return Err(DemarrayError::MissingWeights {
                detail: "the weights array must hold counts".to_string(),
            });
        }

        let mut notices = Vec::new();
        let (values, weights) = conform_weights(array, weights, &mut notices)?;

        // Positions survive reconciliation: conform preserves the value
        // array's dimension order.
        let dropped = self.resolve_dropped(&values)?;
        let data = reduce_weighted(&values, &weights, &dropped);
        let metadata = values.metadata().without(&dropped);
        Ok(ArrayOutput {
            array: DemographicArray::from_parts(values.kind(), metadata, data),
            notices,
        })
    }

    /// Positions of the dimensions to drop, from either configuration.
    fn resolve_dropped(&self, array: &DemographicArray<T>) -> Result<Vec<usize>, DemarrayError> {
        let meta = array.metadata();
        let unknown = |name: &str| DemarrayError::MismatchedDimensions {
            dimensions: vec![name.to_string()],
            detail: "no dimension with this name".to_string(),
        };
        if let Some(keep) = &self.keep {
            for name in keep {
                if meta.position(name).is_none() {
                    return Err(unknown(name));
                }
            }
            Ok((0..meta.ndim())
                .filter(|&i| !keep.iter().any(|k| k.as_str() == meta.dims()[i].name()))
                .collect())
        } else {
            let mut positions = Vec::with_capacity(self.drop.len());
            for name in &self.drop {
                positions.push(meta.position(name).ok_or_else(|| unknown(name))?);
            }
            positions.sort_unstable();
            positions.dedup();
            Ok(positions)
        }
    }
}

// ============================================================================
// Convenience Methods
// ============================================================================

impl<T: Float + Send + Sync> DemographicArray<T> {
    /// Sum the named dimensions out of a Counts array.
    pub fn sum_over(&self, dims: &[&str]) -> Result<ArrayOutput<T>, DemarrayError> {
        Collapse::drop_dims(dims).run(self)
    }

    /// Weighted-mean the named dimensions out of a Values array.
    pub fn weighted_mean_over(
        &self,
        dims: &[&str],
        weights: &DemographicArray<T>,
    ) -> Result<ArrayOutput<T>, DemarrayError> {
        Collapse::drop_dims(dims).weights(weights).run(self)
    }
}

// ============================================================================
// Weight Reconciliation
// ============================================================================

/// Bring a weights array onto the value array's dimensions: sum out weight
/// dimensions the value array lacks (with a notice), require the dimension
/// sets to match, then reconcile labels by the alignment trimming rule.
fn conform_weights<T: Float + Send + Sync>(
    values: &DemographicArray<T>,
    weights: &DemographicArray<T>,
    notices: &mut Vec<Notice>,
) -> Result<(DemographicArray<T>, DemographicArray<T>), DemarrayError> {
    let extra: Vec<String> = weights
        .metadata()
        .names()
        .iter()
        .filter(|n| values.metadata().position(n).is_none())
        .map(|n| n.to_string())
        .collect();

    let reduced;
    let weights = if extra.is_empty() {
        weights
    } else {
        let extra_refs: Vec<&str> = extra.iter().map(String::as_str).collect();
        reduced = Collapse::drop_dims(&extra_refs).run(weights)?.array;
        notices.push(Notice::CollapsedWeightDimensions { dimensions: extra });
        &reduced
    };

    let missing: Vec<String> = values
        .metadata()
        .names()
        .iter()
        .filter(|n| weights.metadata().position(n).is_none())
        .map(|n| n.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DemarrayError::MismatchedDimensions {
            dimensions: missing,
            detail: "the weights array lacks these value dimensions".to_string(),
        });
    }

    let (values, weights, trim_notices) = conform(
        values,
        weights,
        AlignPolicy::Trim,
        Operand::Left,
        Operand::Weights,
    )?;
    notices.extend(trim_notices);
    Ok((values, weights))
}

// ============================================================================
// Reduction Kernels
// ============================================================================

/// Per-cell offsets for a reduction: retained cells enumerate the result
/// in row-major order, dropped cells enumerate one reduction each.
fn reduction_offsets<T: Float>(
    array: &DemographicArray<T>,
    dropped: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    let shape = array.shape();
    let strides = layout::strides(&shape);
    let kept: Vec<usize> = (0..shape.len()).filter(|i| !dropped.contains(i)).collect();
    let kept_offsets =
        layout::selected_offsets(&layout::full_axis_offsets(&shape, &strides, &kept));
    let drop_offsets =
        layout::selected_offsets(&layout::full_axis_offsets(&shape, &strides, dropped));
    (kept_offsets, drop_offsets)
}

/// Sum (or mean) the dropped cells under each retained multi-index.
fn reduce_sum<T: Float + Send + Sync>(
    array: &DemographicArray<T>,
    dropped: &[usize],
    aggregator: Aggregator,
) -> Vec<T> {
    let (kept_offsets, drop_offsets) = reduction_offsets(array, dropped);
    let data = array.data();
    let denom = T::from(drop_offsets.len()).unwrap_or_else(T::one);

    let cell = |&base: &usize| {
        let sum = drop_offsets
            .iter()
            .fold(T::zero(), |acc, &o| acc + data[base + o]);
        match aggregator {
            Aggregator::Sum => sum,
            Aggregator::Mean => sum / denom,
        }
    };

    if kept_offsets.len() * drop_offsets.len() >= PAR_THRESHOLD {
        kept_offsets.par_iter().map(cell).collect()
    } else {
        kept_offsets.iter().map(cell).collect()
    }
}

/// Weighted mean of the dropped cells under each retained multi-index.
/// Both buffers share one layout after reconciliation.
fn reduce_weighted<T: Float + Send + Sync>(
    values: &DemographicArray<T>,
    weights: &DemographicArray<T>,
    dropped: &[usize],
) -> Vec<T> {
    debug_assert_eq!(values.shape(), weights.shape());
    let (kept_offsets, drop_offsets) = reduction_offsets(values, dropped);
    let v = values.data();
    let w = weights.data();

    let cell = |&base: &usize| {
        let mut num = T::zero();
        let mut den = T::zero();
        for &o in &drop_offsets {
            num = num + v[base + o] * w[base + o];
            den = den + w[base + o];
        }
        if den == T::zero() {
            T::nan()
        } else {
            num / den
        }
    };

    if kept_offsets.len() * drop_offsets.len() >= PAR_THRESHOLD {
        kept_offsets.par_iter().map(cell).collect()
    } else {
        kept_offsets.iter().map(cell).collect()
    }
}

// ============================================================================
// Interval Regrouping
// ============================================================================

/// Regroup an Intervals dimension onto coarser breakpoints.
///
/// Every new breakpoint must be one of the existing breakpoints, and the
/// first and last must coincide with the existing first and last. Counts
/// sum the subsumed bins; Values take the weighted mean (weights
/// mandatory, reconciled as in [`Collapse`]).
pub fn regroup_intervals<T: Float + Send + Sync>(
    array: &DemographicArray<T>,
    dim: &str,
    new_breaks: &[f64],
    weights: Option<&DemographicArray<T>>,
) -> Result<ArrayOutput<T>, DemarrayError> {
    let mut notices = Vec::new();

    // Reconcile weights first for Values: trimming may reslice the
    // regrouped dimension, and the breakpoints must be validated against
    // what is actually aggregated.
    let (values, weights) = if array.is_counts() {
        (array.clone(), None)
    } else {
        let weights = weights.ok_or_else(|| DemarrayError::MissingWeights {
            detail: "regrouping a values array requires a counts weights array".to_string(),
        })?;
        if !weights.is_counts() {
            return Err(DemarrayError::MissingWeights {
                detail: "the weights array must hold counts".to_string(),
            });
        }
        let (v, w) = conform_weights(array, weights, &mut notices)?;
        (v, Some(w))
    };

    let pos = values
        .metadata()
        .position(dim)
        .ok_or_else(|| DemarrayError::MismatchedDimensions {
            dimensions: vec![dim.to_string()],
            detail: "no dimension with this name".to_string(),
        })?;
    let old_breaks = match values.metadata().dims()[pos].labels() {
        Labels::Intervals(b) => b.clone(),
        other => {
            return Err(DemarrayError::Parse {
                dimension: dim.to_string(),
                detail: format!("expected an Intervals dimension, found {}", other.scale()),
            })
        }
    };
    let groups = bin_groups(dim, &old_breaks, new_breaks)?;

    let shape = values.shape();
    let mut new_shape = shape.clone();
    new_shape[pos] = new_breaks.len() - 1;
    let new_strides = layout::strides(&new_shape);

    let mut num = vec![T::zero(); layout::element_count(&new_shape)];
    let mut den = vec![T::zero(); num.len()];
    for (flat, &value) in values.data().iter().enumerate() {
        let mut index = layout::unravel(flat, &shape);
        index[pos] = groups[index[pos]];
        let out = layout::offset(&index, &new_strides);
        match &weights {
            Some(w) => {
                let wv = w.data()[flat];
                num[out] = num[out] + value * wv;
                den[out] = den[out] + wv;
            }
            None => num[out] = num[out] + value,
        }
    }
    let data: Vec<T> = if weights.is_some() {
        num.iter()
            .zip(&den)
            .map(|(&n, &d)| if d == T::zero() { T::nan() } else { n / d })
            .collect()
    } else {
        num
    };

    let old_dim = &values.metadata().dims()[pos];
    let new_dim = old_dim.with_labels(Labels::Intervals(new_breaks.to_vec()))?;
    let metadata = values.metadata().replaced(pos, new_dim)?;
    Ok(ArrayOutput {
        array: DemographicArray::from_parts(values.kind(), metadata, data),
        notices,
    })
}

/// Map each old bin to the new bin subsuming it, validating refinement.
fn bin_groups(
    dim: &str,
    old_breaks: &[f64],
    new_breaks: &[f64],
) -> Result<Vec<usize>, DemarrayError> {
    let parse = |detail: String| DemarrayError::Parse {
        dimension: dim.to_string(),
        detail,
    };
    if new_breaks.len() < 2 {
        return Err(parse("need at least 2 new breakpoints".to_string()));
    }
    if new_breaks.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(parse("new breakpoints must be strictly increasing".to_string()));
    }
    if new_breaks[0] != old_breaks[0]
        || new_breaks[new_breaks.len() - 1] != old_breaks[old_breaks.len() - 1]
    {
        return Err(parse(
            "new breakpoints must share the first and last existing breakpoints".to_string(),
        ));
    }
    if new_breaks.iter().any(|b| !old_breaks.contains(b)) {
        return Err(parse(
            "every new breakpoint must be an existing breakpoint".to_string(),
        ));
    }

    let mut groups = Vec::with_capacity(old_breaks.len() - 1);
    let mut g = 0usize;
    for old in old_breaks.windows(2) {
        if old[0] >= new_breaks[g + 1] {
            g += 1;
        }
        groups.push(g);
    }
    Ok(groups)
}

// ============================================================================
// Iteration Collapsing
// ============================================================================

/// A named summary statistic over a cell's iteration draws.
pub type SummaryFn<T> = fn(&[T]) -> T;

/// How to replace an Iterations dimension.
#[derive(Debug, Clone)]
pub enum IterationCollapse<T> {
    /// A Quantiles dimension over the given probabilities.
    Quantiles(Vec<f64>),

    /// A Categories dimension with one named summary per function.
    Summaries(Vec<(String, SummaryFn<T>)>),
}

impl<T> IterationCollapse<T> {
    /// The default probability set {0.025, 0.25, 0.5, 0.75, 0.975}.
    pub fn default_quantiles() -> Self {
        IterationCollapse::Quantiles(vec![0.025, 0.25, 0.5, 0.75, 0.975])
    }
}

/// Replace the Iterations dimension with quantiles or named summaries.
/// The Counts/Values tag of the array is unchanged.
pub fn collapse_iterations<T: Float + Send + Sync>(
    array: &DemographicArray<T>,
    spec: IterationCollapse<T>,
) -> Result<DemographicArray<T>, DemarrayError> {
    let meta = array.metadata();
    let pos = meta
        .dims()
        .iter()
        .position(|d| d.dimscale() == DimScale::Iterations)
        .ok_or_else(|| DemarrayError::MismatchedDimensions {
            dimensions: meta.names().iter().map(|s| s.to_string()).collect(),
            detail: "no iterations dimension to collapse".to_string(),
        })?;

    let new_dim = match &spec {
        IterationCollapse::Quantiles(probs) => {
            Dimension::validate("quantile", DimType::Quantiles, Labels::Quantiles(probs.clone()))?
        }
        IterationCollapse::Summaries(summaries) => {
            if summaries.is_empty() {
                return Err(DemarrayError::Parse {
                    dimension: "summary".to_string(),
                    detail: "no summary functions supplied".to_string(),
                });
            }
            let names: Vec<String> = summaries.iter().map(|(n, _)| n.clone()).collect();
            Dimension::validate("summary", DimType::State, Labels::Categories(names))?
        }
    };
    let out_len = new_dim.len();

    let shape = array.shape();
    let strides = layout::strides(&shape);
    let n_iter = shape[pos];
    let iter_stride = strides[pos];

    let mut new_shape = shape.clone();
    new_shape[pos] = out_len;
    let new_strides = layout::strides(&new_shape);
    let out_stride = new_strides[pos];

    let rest: Vec<usize> = (0..shape.len()).filter(|&d| d != pos).collect();
    let rest_old =
        layout::selected_offsets(&layout::full_axis_offsets(&shape, &strides, &rest));
    let rest_new =
        layout::selected_offsets(&layout::full_axis_offsets(&new_shape, &new_strides, &rest));

    let data = array.data();
    let mut out = vec![T::zero(); layout::element_count(&new_shape)];
    let mut draws = vec![T::zero(); n_iter];
    for (&base_old, &base_new) in rest_old.iter().zip(&rest_new) {
        for (j, d) in draws.iter_mut().enumerate() {
            *d = data[base_old + j * iter_stride];
        }
        match &spec {
            IterationCollapse::Quantiles(probs) => {
                draws.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                for (q, &p) in probs.iter().enumerate() {
                    out[base_new + q * out_stride] = quantile_sorted(&draws, p);
                }
            }
            IterationCollapse::Summaries(summaries) => {
                for (q, (_, f)) in summaries.iter().enumerate() {
                    out[base_new + q * out_stride] = f(&draws);
                }
            }
        }
    }

    let metadata = meta.replaced(pos, new_dim)?;
    Ok(DemographicArray::from_parts(array.kind(), metadata, out))
}

/// Type-7 quantile: linear interpolation between order statistics.
fn quantile_sorted<T: Float>(sorted: &[T], p: f64) -> T {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let frac = T::from(h - h.floor()).unwrap_or_else(T::zero);
    if lo + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

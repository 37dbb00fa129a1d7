//! Scale-specific label values with canonical formatting.
//!
//! ## Purpose
//!
//! This module defines [`Labels`], the validated label sequence of a
//! dimension. There is one variant per dimscale, so a dimension's dimscale
//! is derived from its labels value and the two can never disagree. The
//! module also owns canonical display formatting (the label identity used
//! by alignment and bind), midpoint computation, and index-based selection
//! with the dimscale-specific rules subsetting needs.
//!
//! ## Design notes
//!
//! * Intervals are stored as breakpoints of length categories + 1; the
//!   final breakpoint may be `f64::INFINITY` for an open-ended last
//!   interval. A breakpoint vector cannot represent holes, so selection
//!   must retain a contiguous run of intervals.
//! * Iterations store only the draw count; the labels 1..=n are implied.
//!   Selection renumbers retained draws so the contiguity invariant holds.
//! * Canonical display renders integer intervals demographic style:
//!   width-1 as the single integer ("5"), wider as "5-9", open-ended as
//!   "90+". Re-parsing canonical labels yields the same breakpoints.
//! * Validation is fail-fast and carries the offending values, in the
//!   manner of the crate's other validators.
//!
//! ## Invariants
//!
//! * Points, breakpoints, and quantile probabilities are strictly
//!   increasing; probabilities lie in (0, 1).
//! * Category labels are distinct; sex and triangle tokens are distinct
//!   members of their canonical two-element sets.
//!
//! ## Visibility
//!
//! [`Labels`] is part of the public API; construction normally goes
//! through inference rather than direct variant building.

use crate::model::scale::{DimScale, Sex, Triangle};
use crate::primitives::errors::DemarrayError;

// ============================================================================
// Labels
// ============================================================================

/// Validated label sequence of a dimension; the variant is the dimscale.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// Strictly increasing scalar points.
    Points(Vec<f64>),

    /// Breakpoints of contiguous half-open intervals, length categories + 1.
    Intervals(Vec<f64>),

    /// Lexis triangles.
    Triangles(Vec<Triangle>),

    /// The sexes.
    Sexes(Vec<Sex>),

    /// Distinct category strings.
    Categories(Vec<String>),

    /// Draw count n, denoting labels 1..=n.
    Iterations(usize),

    /// Strictly increasing probabilities in (0, 1).
    Quantiles(Vec<f64>),
}

impl Labels {
    /// The dimscale this labels value represents.
    pub fn scale(&self) -> DimScale {
        match self {
            Labels::Points(_) => DimScale::Points,
            Labels::Intervals(_) => DimScale::Intervals,
            Labels::Triangles(_) => DimScale::Triangles,
            Labels::Sexes(_) => DimScale::Sexes,
            Labels::Categories(_) => DimScale::Categories,
            Labels::Iterations(_) => DimScale::Iterations,
            Labels::Quantiles(_) => DimScale::Quantiles,
        }
    }

    /// Number of categories along the dimension.
    pub fn len(&self) -> usize {
        match self {
            Labels::Points(v) | Labels::Quantiles(v) => v.len(),
            Labels::Intervals(breaks) => breaks.len().saturating_sub(1),
            Labels::Triangles(v) => v.len(),
            Labels::Sexes(v) => v.len(),
            Labels::Categories(v) => v.len(),
            Labels::Iterations(n) => *n,
        }
    }

    /// Whether the dimension has no categories.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the numeric and distinctness invariants of the variant.
    pub fn validate(&self, dimension: &str) -> Result<(), DemarrayError> {
        let parse = |detail: String| DemarrayError::Parse {
            dimension: dimension.to_string(),
            detail,
        };

        match self {
            Labels::Points(v) => {
                ensure_increasing(v, "points").map_err(parse)?;
                if v.iter().any(|x| !x.is_finite()) {
                    return Err(parse("points must be finite".to_string()));
                }
            }
            Labels::Intervals(breaks) => {
                if breaks.len() < 2 {
                    return Err(parse(format!(
                        "intervals need at least 2 breakpoints, got {}",
                        breaks.len()
                    )));
                }
                ensure_increasing(breaks, "breakpoints").map_err(parse)?;
                if breaks[0].is_infinite() {
                    return Err(parse("first breakpoint must be finite".to_string()));
                }
                // Only the last breakpoint may be infinite (open-ended).
                if breaks[..breaks.len() - 1].iter().any(|x| !x.is_finite()) {
                    return Err(parse(
                        "only the final breakpoint may be infinite".to_string(),
                    ));
                }
            }
            Labels::Triangles(v) => {
                if v.is_empty() || v.len() > 2 || (v.len() == 2 && v[0] == v[1]) {
                    return Err(parse(
                        "triangles must be distinct members of {Lower, Upper}".to_string(),
                    ));
                }
            }
            Labels::Sexes(v) => {
                if v.is_empty() || v.len() > 2 || (v.len() == 2 && v[0] == v[1]) {
                    return Err(parse(
                        "sexes must be distinct members of {female, male}".to_string(),
                    ));
                }
            }
            Labels::Categories(v) => {
                for (i, a) in v.iter().enumerate() {
                    if v[..i].contains(a) {
                        return Err(parse(format!("duplicate category `{}`", a)));
                    }
                }
            }
            Labels::Iterations(_) => {}
            Labels::Quantiles(v) => {
                ensure_increasing(v, "probabilities").map_err(parse)?;
                if v.iter().any(|&p| !(0.0 < p && p < 1.0)) {
                    return Err(parse("probabilities must lie in (0, 1)".to_string()));
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Canonical Display
    // ========================================================================

    /// Canonical display labels, one per category.
    ///
    /// These strings are the label identity used by alignment and bind.
    pub fn display(&self) -> Vec<String> {
        match self {
            Labels::Points(v) => v.iter().map(|&x| fmt_number(x)).collect(),
            Labels::Intervals(breaks) => breaks
                .windows(2)
                .map(|w| fmt_interval(w[0], w[1]))
                .collect(),
            Labels::Triangles(v) => v.iter().map(|t| t.as_str().to_string()).collect(),
            Labels::Sexes(v) => v.iter().map(|s| s.as_str().to_string()).collect(),
            Labels::Categories(v) => v.clone(),
            Labels::Iterations(n) => (1..=*n).map(|i| i.to_string()).collect(),
            Labels::Quantiles(v) => v.iter().map(|&p| fmt_quantile(p)).collect(),
        }
    }

    /// Midpoint scalar per category, for Points and Intervals only.
    ///
    /// A bounded interval's midpoint is (lo + hi) / 2. An unbounded final
    /// interval stands in its lower bound plus half the preceding
    /// interval's width (half of 1.0 when it is the only interval).
    pub fn midpoints(&self) -> Option<Vec<f64>> {
        match self {
            Labels::Points(v) => Some(v.clone()),
            Labels::Intervals(breaks) => {
                let mids = breaks
                    .windows(2)
                    .enumerate()
                    .map(|(i, w)| {
                        if w[1].is_finite() {
                            (w[0] + w[1]) / 2.0
                        } else {
                            let prev_width = if i > 0 {
                                breaks[i] - breaks[i - 1]
                            } else {
                                1.0
                            };
                            w[0] + prev_width / 2.0
                        }
                    })
                    .collect();
                Some(mids)
            }
            _ => None,
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Labels retained by the given index list, in list order.
    ///
    /// Subsetting passes indices in original label order; alignment may
    /// reorder an operand's categories. Intervals must keep a contiguous
    /// run (a breakpoint vector cannot represent holes); iterations are
    /// renumbered 1..=k. Ordered scales revalidate on reconstruction.
    pub fn take(&self, dimension: &str, indices: &[usize]) -> Result<Labels, DemarrayError> {
        if indices.is_empty() {
            return Err(DemarrayError::EmptyResult {
                dimension: dimension.to_string(),
            });
        }

        let picked = |v: &Vec<f64>| indices.iter().map(|&i| v[i]).collect::<Vec<_>>();

        match self {
            Labels::Points(v) => Ok(Labels::Points(picked(v))),
            Labels::Quantiles(v) => Ok(Labels::Quantiles(picked(v))),
            Labels::Intervals(breaks) => {
                let contiguous = indices.windows(2).all(|w| w[1] == w[0] + 1);
                if !contiguous {
                    return Err(DemarrayError::Parse {
                        dimension: dimension.to_string(),
                        detail: "retained intervals are not contiguous".to_string(),
                    });
                }
                let first = indices[0];
                let last = indices[indices.len() - 1];
                Ok(Labels::Intervals(breaks[first..=last + 1].to_vec()))
            }
            Labels::Triangles(v) => Ok(Labels::Triangles(
                indices.iter().map(|&i| v[i]).collect(),
            )),
            Labels::Sexes(v) => Ok(Labels::Sexes(indices.iter().map(|&i| v[i]).collect())),
            Labels::Categories(v) => Ok(Labels::Categories(
                indices.iter().map(|&i| v[i].clone()).collect(),
            )),
            Labels::Iterations(_) => Ok(Labels::Iterations(indices.len())),
        }
    }
}

// ============================================================================
// Formatting Helpers
// ============================================================================

/// Render a scalar with trailing zeros trimmed ("2008", "2.5").
pub(crate) fn fmt_number(x: f64) -> String {
    if x.is_finite() && x == x.trunc() && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// Render one half-open interval [lo, hi) demographic style.
fn fmt_interval(lo: f64, hi: f64) -> String {
    if hi.is_infinite() {
        return format!("{}+", fmt_number(lo));
    }
    let integral = lo == lo.trunc() && hi == hi.trunc();
    if integral {
        if hi - lo == 1.0 {
            fmt_number(lo)
        } else {
            format!("{}-{}", fmt_number(lo), fmt_number(hi - 1.0))
        }
    } else {
        format!("{}-{}", fmt_number(lo), fmt_number(hi))
    }
}

/// Render a quantile probability as a percentage ("2.5%", "50%").
fn fmt_quantile(p: f64) -> String {
    // Round away float noise from the percent scaling.
    let pct = (p * 100.0 * 1e9).round() / 1e9;
    format!("{}%", fmt_number(pct))
}

/// Strictly-increasing check shared by the numeric variants.
fn ensure_increasing(v: &[f64], what: &str) -> Result<(), String> {
    for w in v.windows(2) {
        if !(w[0] < w[1]) {
            return Err(format!(
                "{} must be strictly increasing, found {} then {}",
                what,
                fmt_number(w[0]),
                fmt_number(w[1])
            ));
        }
    }
    Ok(())
}

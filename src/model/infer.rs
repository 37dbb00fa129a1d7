//! Dimscale inference from raw label strings.
//!
//! ## Purpose
//!
//! This module turns raw labels plus a dimtype (and an optional
//! caller-supplied dimscale override) into a validated [`Dimension`]. It
//! owns the three label grammars (explicit ranges "10-19", open-ended
//! ranges "90+", and bare numbers / percentages) and the per-dimtype
//! policy deciding which dimscale a label sequence denotes.
//!
//! ## Design notes
//!
//! * An override is validated against the compatibility table and against
//!   the labels' parseability, and suppresses all guessing.
//! * The one documented guess: an age dimension labelled with consecutive
//!   single integers is read as one-unit intervals (with a synthesized
//!   final breakpoint) and carries an [`Notice::AssumedIntervals`].
//! * Time-like dimensions are never guessed: bare numbers without an
//!   override fail with `AmbiguousDimscale`.
//! * Validation is fail-fast and error messages carry the offending label,
//!   in the manner of the crate's validators.
//!
//! ## Key concepts
//!
//! ### Range grammar
//!
//! "10-19" with integer endpoints denotes the half-open interval [10, 20);
//! demographic convention reads the upper endpoint inclusively. With
//! decimal endpoints, "2.5-3.5" denotes [2.5, 3.5) directly. "90+" denotes
//! [90, ∞) and may only appear last. Ranged labels must chain: each
//! label's exclusive upper bound is the next label's lower bound.
//!
//! ### Idempotence
//!
//! Re-running inference over a dimension's own canonical display labels
//! yields the same dimscale: canonical interval labels re-parse as ranges
//! (or as the consecutive integers the age default reads back), canonical
//! points re-parse as numbers, canonical quantiles as percentages.
//!
//! ## Visibility
//!
//! [`infer_dimension`] is the construction path used by the builder and
//! the labeled-array coercion; it is also public for direct use.

use crate::model::dimension::Dimension;
use crate::model::labels::Labels;
use crate::model::scale::{DimScale, DimType, Sex, Triangle};
use crate::primitives::errors::DemarrayError;
use crate::primitives::notices::Notice;

// ============================================================================
// Inference Output
// ============================================================================

/// A validated dimension plus any notices inference emitted.
#[derive(Debug, Clone)]
pub struct Inference {
    /// The inferred, validated dimension.
    pub dimension: Dimension,

    /// Notices for defaults applied during inference.
    pub notices: Vec<Notice>,
}

// ============================================================================
// Raw Label Grammar
// ============================================================================

/// One raw label parsed against the grammars, before any policy applies.
#[derive(Debug, Clone, PartialEq)]
enum RawLabel {
    /// Half-open range [lo, hi).
    Range { lo: f64, hi: f64 },

    /// Open-ended range [lo, ∞).
    Open { lo: f64 },

    /// Bare number.
    Number(f64),

    /// Percentage, stored as a probability.
    Percent(f64),

    /// Anything else.
    Text,
}

/// Parse one raw label. Never fails; the policy decides what is acceptable.
fn parse_raw(raw: &str) -> RawLabel {
    let s = raw.trim();
    if s.is_empty() {
        return RawLabel::Text;
    }
    if let Ok(x) = s.parse::<f64>() {
        if x.is_finite() {
            return RawLabel::Number(x);
        }
        return RawLabel::Text;
    }
    if let Some(body) = s.strip_suffix('%') {
        if let Ok(x) = body.trim().parse::<f64>() {
            if x.is_finite() {
                return RawLabel::Percent(x / 100.0);
            }
        }
        return RawLabel::Text;
    }
    if let Some(body) = s.strip_suffix('+') {
        if let Ok(lo) = body.trim().parse::<f64>() {
            if lo.is_finite() {
                return RawLabel::Open { lo };
            }
        }
        return RawLabel::Text;
    }
    // Range: split at a '-' that is not the leading sign.
    if let Some(split) = s[1..].find('-').map(|i| i + 1) {
        let (left, right) = (s[..split].trim(), s[split + 1..].trim());
        if let (Ok(lo), Ok(hi)) = (left.parse::<f64>(), right.parse::<f64>()) {
            if lo.is_finite() && hi.is_finite() {
                let integral = !left.contains('.') && !right.contains('.');
                // Integer ranges read the upper endpoint inclusively.
                let hi = if integral { hi + 1.0 } else { hi };
                return RawLabel::Range { lo, hi };
            }
        }
    }
    RawLabel::Text
}

// ============================================================================
// Inference Entry Point
// ============================================================================

/// Infer and validate a dimension from raw labels.
///
/// `override_scale` skips guessing: the labels are parsed directly against
/// the requested scale after the compatibility table admits it.
pub fn infer_dimension(
    name: impl Into<String>,
    dimtype: DimType,
    raw: &[String],
    override_scale: Option<DimScale>,
) -> Result<Inference, DemarrayError> {
    let name = name.into();
    if raw.is_empty() {
        return Err(DemarrayError::Parse {
            dimension: name,
            detail: "no labels supplied".to_string(),
        });
    }
    let parsed: Vec<RawLabel> = raw.iter().map(|s| parse_raw(s)).collect();

    if let Some(scale) = override_scale {
        if !dimtype.permits(scale) {
            return Err(DemarrayError::IncompatibleDimtype {
                dimension: name,
                dimtype: dimtype.as_str().to_string(),
                detail: format!("dimscale {} is not permitted", scale),
            });
        }
        let labels = labels_for_scale(&name, dimtype, scale, raw, &parsed)?;
        let dimension = Dimension::validate(name, dimtype, labels)?;
        return Ok(Inference {
            dimension,
            notices: Vec::new(),
        });
    }

    let mut notices = Vec::new();
    let labels = match dimtype {
        DimType::Age => infer_age(&name, raw, &parsed, &mut notices)?,
        DimType::Time | DimType::Cohort => infer_timelike(&name, dimtype, raw, &parsed)?,
        DimType::Sex => parse_sexes(&name, raw)?,
        DimType::Triangle => parse_triangles(&name, raw)?,
        DimType::State
        | DimType::Origin
        | DimType::Destination
        | DimType::Parent
        | DimType::Child => Labels::Categories(raw.to_vec()),
        DimType::Iterations => parse_iterations(&name, raw, &parsed)?,
        DimType::Quantiles => parse_quantiles(&name, raw, &parsed)?,
    };
    let dimension = Dimension::validate(name, dimtype, labels)?;
    Ok(Inference { dimension, notices })
}

// ============================================================================
// Per-Dimtype Policy
// ============================================================================

/// Age: ranges are intervals; consecutive single integers are assumed
/// one-unit intervals (with a notice); other numbers need an override.
fn infer_age(
    name: &str,
    raw: &[String],
    parsed: &[RawLabel],
    notices: &mut Vec<Notice>,
) -> Result<Labels, DemarrayError> {
    if interval_notation(parsed) {
        return Labels::Intervals(assemble_breaks(name, parsed)?).validate_ok(name);
    }
    if let Some(numbers) = all_numbers(parsed) {
        ensure_increasing_numbers(name, &numbers)?;
        let consecutive = numbers.iter().all(|&x| x == x.trunc())
            && numbers.windows(2).all(|w| w[1] - w[0] == 1.0);
        if consecutive {
            let mut breaks = numbers.clone();
            breaks.push(numbers[numbers.len() - 1] + 1.0);
            notices.push(Notice::AssumedIntervals {
                dimension: name.to_string(),
            });
            return Labels::Intervals(breaks).validate_ok(name);
        }
        return Err(DemarrayError::AmbiguousDimscale {
            dimension: name.to_string(),
            detail: "numeric labels may denote points or interval lower bounds; \
                     supply a dimscale override"
                .to_string(),
        });
    }
    Err(unparseable(name, raw, parsed, "ranges or numbers"))
}

/// Time/cohort: ranges are intervals; bare numbers are never guessed.
fn infer_timelike(
    name: &str,
    dimtype: DimType,
    raw: &[String],
    parsed: &[RawLabel],
) -> Result<Labels, DemarrayError> {
    if interval_notation(parsed) {
        return Labels::Intervals(assemble_breaks(name, parsed)?).validate_ok(name);
    }
    if let Some(numbers) = all_numbers(parsed) {
        ensure_increasing_numbers(name, &numbers)?;
        return Err(DemarrayError::AmbiguousDimscale {
            dimension: name.to_string(),
            detail: format!(
                "numeric labels on a {} dimension may denote points or interval \
                 lower bounds; supply a dimscale override",
                dimtype
            ),
        });
    }
    Err(unparseable(name, raw, parsed, "ranges or numbers"))
}

/// Sex: case-normalized tokens, exactly {female, male}.
fn parse_sexes(name: &str, raw: &[String]) -> Result<Labels, DemarrayError> {
    let mut sexes = Vec::with_capacity(raw.len());
    for label in raw {
        match Sex::parse(label) {
            Some(s) => sexes.push(s),
            None => {
                return Err(DemarrayError::IncompatibleDimtype {
                    dimension: name.to_string(),
                    dimtype: DimType::Sex.as_str().to_string(),
                    detail: format!("label `{}` is not one of {{female, male}}", label),
                })
            }
        }
    }
    if sexes.len() != 2 || sexes[0] == sexes[1] {
        return Err(DemarrayError::IncompatibleDimtype {
            dimension: name.to_string(),
            dimtype: DimType::Sex.as_str().to_string(),
            detail: "labels must be exactly {female, male}".to_string(),
        });
    }
    Ok(Labels::Sexes(sexes))
}

/// Triangle: the two canonical Lexis tokens.
fn parse_triangles(name: &str, raw: &[String]) -> Result<Labels, DemarrayError> {
    let mut tris = Vec::with_capacity(raw.len());
    for label in raw {
        match Triangle::parse(label) {
            Some(t) => tris.push(t),
            None => {
                return Err(DemarrayError::Parse {
                    dimension: name.to_string(),
                    detail: format!("label `{}` is not one of {{Lower, Upper}}", label),
                })
            }
        }
    }
    Ok(Labels::Triangles(tris))
}

/// Iterations: exactly the contiguous sequence 1..=n, in order.
fn parse_iterations(
    name: &str,
    raw: &[String],
    parsed: &[RawLabel],
) -> Result<Labels, DemarrayError> {
    for (i, p) in parsed.iter().enumerate() {
        let expected = (i + 1) as f64;
        match p {
            RawLabel::Number(x) if *x == expected => {}
            _ => {
                return Err(DemarrayError::Parse {
                    dimension: name.to_string(),
                    detail: format!(
                        "iteration labels must be 1..={}, found `{}` at position {}",
                        raw.len(),
                        raw[i],
                        i + 1
                    ),
                })
            }
        }
    }
    Ok(Labels::Iterations(raw.len()))
}

/// Quantiles: probabilities or percentages, strictly increasing in (0, 1).
fn parse_quantiles(
    name: &str,
    raw: &[String],
    parsed: &[RawLabel],
) -> Result<Labels, DemarrayError> {
    let mut probs = Vec::with_capacity(parsed.len());
    for (p, label) in parsed.iter().zip(raw) {
        match p {
            RawLabel::Number(x) => probs.push(*x),
            RawLabel::Percent(x) => probs.push(*x),
            _ => {
                return Err(DemarrayError::Parse {
                    dimension: name.to_string(),
                    detail: format!("label `{}` is not a probability", label),
                })
            }
        }
    }
    Labels::Quantiles(probs).validate_ok(name)
}

// ============================================================================
// Override Parsing
// ============================================================================

/// Parse labels directly against an explicitly requested scale.
fn labels_for_scale(
    name: &str,
    dimtype: DimType,
    scale: DimScale,
    raw: &[String],
    parsed: &[RawLabel],
) -> Result<Labels, DemarrayError> {
    match scale {
        DimScale::Points => match all_numbers(parsed) {
            Some(numbers) => Labels::Points(numbers).validate_ok(name),
            None => Err(unparseable(name, raw, parsed, "numbers")),
        },
        DimScale::Intervals => {
            if interval_notation(parsed) {
                return Labels::Intervals(assemble_breaks(name, parsed)?).validate_ok(name);
            }
            match all_numbers(parsed) {
                // Bare numbers under an Intervals override are lower bounds;
                // the final breakpoint is synthesized one last-gap past the
                // last (one unit for a single label).
                Some(numbers) => {
                    let last = numbers[numbers.len() - 1];
                    let gap = if numbers.len() >= 2 {
                        last - numbers[numbers.len() - 2]
                    } else {
                        1.0
                    };
                    let mut breaks = numbers;
                    breaks.push(last + gap);
                    Labels::Intervals(breaks).validate_ok(name)
                }
                None => Err(unparseable(name, raw, parsed, "ranges or numbers")),
            }
        }
        DimScale::Triangles => parse_triangles(name, raw),
        DimScale::Sexes => parse_sexes(name, raw),
        DimScale::Categories => Ok(Labels::Categories(raw.to_vec())),
        DimScale::Iterations => parse_iterations(name, raw, parsed),
        DimScale::Quantiles => parse_quantiles(name, raw, parsed),
    }
    .map_err(|e| match e {
        // Surface the override context on table-independent failures.
        DemarrayError::Parse { dimension, detail } => DemarrayError::Parse {
            dimension,
            detail: format!("{} (requested dimscale {} on {})", detail, scale, dimtype),
        },
        other => other,
    })
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// The numbers, if every label is a bare number.
fn all_numbers(parsed: &[RawLabel]) -> Option<Vec<f64>> {
    parsed
        .iter()
        .map(|p| match p {
            RawLabel::Number(x) => Some(*x),
            _ => None,
        })
        .collect()
}

/// Whether the labels use interval notation: at least one range or
/// open-ended label, the rest at most bare integers (one-unit intervals;
/// the canonical rendering of a width-1 bin is its single integer).
fn interval_notation(parsed: &[RawLabel]) -> bool {
    parsed.iter().any(|p| {
        matches!(p, RawLabel::Range { .. } | RawLabel::Open { .. })
    }) && parsed.iter().all(|p| match p {
        RawLabel::Range { .. } | RawLabel::Open { .. } => true,
        RawLabel::Number(x) => *x == x.trunc(),
        _ => false,
    })
}

/// Strictly-increasing check for bare-number label sequences.
fn ensure_increasing_numbers(name: &str, numbers: &[f64]) -> Result<(), DemarrayError> {
    for w in numbers.windows(2) {
        if !(w[0] < w[1]) {
            return Err(DemarrayError::Parse {
                dimension: name.to_string(),
                detail: "numeric labels must be strictly increasing".to_string(),
            });
        }
    }
    Ok(())
}

/// Assemble chained ranges (and one-unit integer bins) into breakpoints.
fn assemble_breaks(name: &str, parsed: &[RawLabel]) -> Result<Vec<f64>, DemarrayError> {
    let mut breaks = Vec::with_capacity(parsed.len() + 1);
    for (i, p) in parsed.iter().enumerate() {
        let (lo, hi) = match p {
            RawLabel::Range { lo, hi } => (*lo, *hi),
            RawLabel::Number(x) => (*x, *x + 1.0),
            RawLabel::Open { lo } => {
                if i != parsed.len() - 1 {
                    return Err(DemarrayError::Parse {
                        dimension: name.to_string(),
                        detail: "an open-ended range may only appear last".to_string(),
                    });
                }
                (*lo, f64::INFINITY)
            }
            _ => unreachable!("caller checked every label is a range"),
        };
        if let Some(&prev_hi) = breaks.last() {
            if prev_hi != lo {
                return Err(DemarrayError::Parse {
                    dimension: name.to_string(),
                    detail: format!(
                        "intervals do not chain: expected a lower bound of {}, found {}",
                        prev_hi, lo
                    ),
                });
            }
        } else {
            breaks.push(lo);
        }
        breaks.push(hi);
    }
    Ok(breaks)
}

/// Error for labels none of the grammars accept, naming the first offender.
fn unparseable(
    name: &str,
    raw: &[String],
    parsed: &[RawLabel],
    expected: &str,
) -> DemarrayError {
    let offender = parsed
        .iter()
        .position(|p| matches!(p, RawLabel::Text | RawLabel::Percent(_)))
        .or_else(|| parsed.iter().position(|p| !matches!(p, RawLabel::Number(_))))
        .unwrap_or(0);
    DemarrayError::Parse {
        dimension: name.to_string(),
        detail: format!("expected {}, found `{}`", expected, raw[offender]),
    }
}

/// Small extension: validate a labels value and return it.
trait ValidateOk: Sized {
    fn validate_ok(self, dimension: &str) -> Result<Self, DemarrayError>;
}

impl ValidateOk for Labels {
    fn validate_ok(self, dimension: &str) -> Result<Self, DemarrayError> {
        self.validate(dimension)?;
        Ok(self)
    }
}

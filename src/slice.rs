//! NumPy-style slice-string grammar.
//!
//! Parses strings like `"0:10, :, 5"` or `"..."` into a sequence of
//! [`SliceTerm`]s, one per dataset dimension. The grammar is recognized by
//! hand (splitting, trimming, and a strict integer lexer) and never by a
//! general-purpose expression evaluator: the slice text comes from an
//! untrusted automated caller, and routing it through an evaluator would turn
//! a data-slicing field into a code-injection vector.
//!
//! Accepted components, comma-separated:
//!
//! - a signed integer (`5`, `-1`)
//! - a range with one or two `:` separators (`1:10`, `:5`, `::2`, `:`)
//! - the literal ellipsis `...`
//!
//! Everything else fails with a [`SliceError`] naming the violated rule.

use crate::error::SliceError;

/// One parsed dimension-selection term.
///
/// Term order is significant: the accessor maps terms positionally onto
/// dataset dimensions, with [`SliceTerm::Ellipsis`] expanding to fill the
/// unspecified dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceTerm {
    /// A single index; negative values count from the end of the axis
    Index(i64),

    /// A `start:stop:step` range; unset parts fall back to the axis defaults
    Range {
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },

    /// The `...` placeholder filling all otherwise-unspecified dimensions
    Ellipsis,
}

impl SliceTerm {
    /// A `:` range selecting an entire axis.
    pub const fn full_range() -> Self {
        SliceTerm::Range {
            start: None,
            stop: None,
            step: None,
        }
    }
}

/// Parse a slice string into an ordered sequence of [`SliceTerm`]s.
///
/// An empty (or all-whitespace) string yields an empty sequence, meaning
/// "read everything". The parse is pure and deterministic; malformed input is
/// rejected, never guessed at.
///
/// # Examples
///
/// ```
/// use h5_bridge::slice::{parse_slice, SliceTerm};
///
/// assert_eq!(parse_slice("5").unwrap(), vec![SliceTerm::Index(5)]);
/// assert_eq!(
///     parse_slice("0:10:2").unwrap(),
///     vec![SliceTerm::Range { start: Some(0), stop: Some(10), step: Some(2) }]
/// );
/// assert_eq!(parse_slice("...").unwrap(), vec![SliceTerm::Ellipsis]);
/// ```
pub fn parse_slice(slice_str: &str) -> Result<Vec<SliceTerm>, SliceError> {
    let trimmed = slice_str.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut terms = Vec::new();
    for component in trimmed.split(',') {
        terms.push(parse_component(component.trim())?);
    }
    Ok(terms)
}

fn parse_component(component: &str) -> Result<SliceTerm, SliceError> {
    if component.is_empty() {
        return Err(SliceError::EmptyComponent);
    }

    if component == "..." {
        return Ok(SliceTerm::Ellipsis);
    }

    if is_integer(component) {
        return Ok(SliceTerm::Index(parse_int(component)?));
    }

    if !component.contains(':') {
        return Err(SliceError::InvalidComponent(component.to_string()));
    }

    let parts: Vec<&str> = component.split(':').collect();
    if parts.len() > 3 {
        return Err(SliceError::TooManyColons(component.to_string()));
    }

    let mut bounds = [None; 3];
    for (slot, part) in bounds.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !is_integer(part) {
            return Err(SliceError::InvalidValue(part.to_string()));
        }
        *slot = Some(parse_int(part)?);
    }

    Ok(SliceTerm::Range {
        start: bounds[0],
        stop: bounds[1],
        step: bounds[2],
    })
}

/// Strict signed-integer lexical check: optional `-`, then one or more ASCII
/// digits, nothing else.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_int(s: &str) -> Result<i64, SliceError> {
    s.parse::<i64>()
        .map_err(|_| SliceError::InvalidValue(s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

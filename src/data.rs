//! Bounded dataset reads and the transport-neutral value tree.
//!
//! [`read_dataset_slice`] applies parsed slice terms positionally to a
//! dataset's dimensions and converts the result into a [`SlicedValue`], a
//! nested value tree that serializes to plain JSON. Range bounds are clamped
//! to the axis extents rather than rejected; malformed selections (too many
//! indices, out-of-range integer index, zero step) fail with
//! [`StoreError::SliceApplication`] carrying the dataset shape.

use std::path::Path;

use ndarray::ArrayViewD;
use serde::Serialize;

use crate::error::StoreError;
use crate::slice::SliceTerm;
use crate::store::{AxisSelector, DataFile, DataStore, NodeKind, RawArray};

/// A recursively nested scalar/sequence tree mirroring the sliced shape.
///
/// Serializes untagged: scalars become JSON numbers, booleans or strings,
/// sequences become JSON arrays. A rank-0 result is a bare scalar, never a
/// one-element sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlicedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<SlicedValue>),
}

/// Read a slice of the dataset at `internal_path` inside `file_path`.
///
/// An empty `terms` sequence reads the entire dataset. Term order maps
/// positionally onto dataset dimensions; a single `...` expands to fill the
/// unspecified dimensions and missing trailing dimensions default to full
/// ranges.
pub fn read_dataset_slice<S: DataStore>(
    store: &S,
    file_path: &Path,
    internal_path: &str,
    terms: &[SliceTerm],
) -> Result<SlicedValue, StoreError> {
    let file = store.open_read(file_path)?;

    let kind = file
        .node_kind(internal_path)?
        .ok_or_else(|| StoreError::PathNotFound {
            path: internal_path.to_string(),
            file: file_path.to_path_buf(),
        })?;
    match kind {
        NodeKind::Dataset => {}
        other => {
            return Err(StoreError::NotADataset {
                path: internal_path.to_string(),
                kind: other.name().to_string(),
            })
        }
    }

    let meta = file.dataset_meta(internal_path)?;
    let selectors = expand_terms(terms, &meta.shape)?;
    let raw = file.read_raw(internal_path)?;
    let sliced = raw.apply(&selectors)?;
    Ok(to_value(&sliced))
}

// =============================================================================
// Term Expansion
// =============================================================================

/// Map slice terms onto dataset dimensions, yielding one selector per axis.
///
/// Expansion rules: at most one `...`, which fills the dimensions the other
/// terms leave unspecified; without an ellipsis, missing trailing dimensions
/// are padded with full ranges. More terms than dimensions is an error.
fn expand_terms(terms: &[SliceTerm], shape: &[usize]) -> Result<Vec<AxisSelector>, StoreError> {
    let ndim = shape.len();
    let ellipses = terms
        .iter()
        .filter(|t| matches!(t, SliceTerm::Ellipsis))
        .count();
    if ellipses > 1 {
        return Err(StoreError::SliceApplication {
            shape: shape.to_vec(),
            message: "only one '...' is allowed per slice".to_string(),
        });
    }

    let explicit = terms.len() - ellipses;
    if explicit > ndim {
        return Err(StoreError::SliceApplication {
            shape: shape.to_vec(),
            message: format!(
                "too many indices: {explicit} for {ndim}-dimensional dataset"
            ),
        });
    }
    let fill = ndim - explicit;

    let mut selectors = Vec::with_capacity(ndim);
    for term in terms {
        match term {
            SliceTerm::Ellipsis => {
                selectors.extend(std::iter::repeat(AxisSelector::full()).take(fill));
            }
            SliceTerm::Index(i) => selectors.push(AxisSelector::Index(*i)),
            SliceTerm::Range { start, stop, step } => selectors.push(AxisSelector::Range {
                start: *start,
                stop: *stop,
                step: *step,
            }),
        }
    }
    // no ellipsis: unspecified trailing dimensions read in full
    while selectors.len() < ndim {
        selectors.push(AxisSelector::full());
    }
    Ok(selectors)
}

// =============================================================================
// Value Conversion
// =============================================================================

fn to_value(raw: &RawArray) -> SlicedValue {
    match raw {
        RawArray::Int(a) => nest(a.view(), &SlicedValue::Int),
        RawArray::Float(a) => nest(a.view(), &SlicedValue::Float),
        RawArray::Bool(a) => nest(a.view(), &SlicedValue::Bool),
        RawArray::Text(a) => nest(a.view(), &SlicedValue::Text),
    }
}

fn nest<T: Clone>(view: ArrayViewD<'_, T>, wrap: &dyn Fn(T) -> SlicedValue) -> SlicedValue {
    if view.ndim() == 0 {
        // a rank-0 array holds exactly one element
        match view.iter().next() {
            Some(v) => wrap(v.clone()),
            None => SlicedValue::Seq(Vec::new()),
        }
    } else {
        SlicedValue::Seq(view.outer_iter().map(|sub| nest(sub, wrap)).collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Hierarchical-data store abstraction.
//!
//! This module defines the narrow interface the addressing and slicing core
//! requires from an HDF5-like store, so the core never depends on a concrete
//! format library:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        describe / read accessors        │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        DataStore / DataFile traits      │
//! │   (open read-only, introspect, read)    │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │    Hdf5Store    │    │    MemoryStore      │
//! │  (hdf5 crate)   │    │ (tests, examples)   │
//! └─────────────────┘    └─────────────────────┘
//! ```
//!
//! Every operation opens its own read-only handle and drops it when done;
//! neither trait carries mutable state, so concurrent callers need no
//! synchronization.

use std::fmt;
use std::path::Path;

use ndarray::{ArrayD, ArrayViewD, IxDyn, SliceInfo, SliceInfoElem};
use serde::Serialize;

use crate::error::StoreError;

mod hdf5;
mod memory;

pub use self::hdf5::Hdf5Store;
pub use self::memory::{MemoryFile, MemoryStore};

// =============================================================================
// Store Traits
// =============================================================================

/// Factory for read-only file handles.
///
/// Implementations must support concurrent independent handles to the same
/// path; the core performs no caller-side locking.
pub trait DataStore: Send + Sync {
    /// Read-only handle type produced by [`DataStore::open_read`].
    type File: DataFile;

    /// Open a file for reading.
    ///
    /// Fails with [`StoreError::FileNotFound`] when the path does not exist
    /// and [`StoreError::Io`] when the file exists but cannot be opened.
    fn open_read(&self, path: &Path) -> Result<Self::File, StoreError>;
}

/// Read-only view of one hierarchical file.
///
/// Internal paths are `/`-separated and absolute within the file; `/` names
/// the root container.
pub trait DataFile {
    /// Link information at a path, without following the link.
    ///
    /// Returns `None` when the path is absent or names a non-link object.
    fn link_target(&self, internal_path: &str) -> Result<Option<LinkTarget>, StoreError>;

    /// Kind of the object a path resolves to (following links), or `None`
    /// when the path does not resolve.
    fn node_kind(&self, internal_path: &str) -> Result<Option<NodeKind>, StoreError>;

    /// Attributes of the object at a path, in store order.
    fn attributes(&self, internal_path: &str) -> Result<Vec<(String, AttrValue)>, StoreError>;

    /// Immediate child names of a container, in store order.
    fn child_names(&self, internal_path: &str) -> Result<Vec<String>, StoreError>;

    /// Shape, element type, element count and chunking of a dataset.
    fn dataset_meta(&self, internal_path: &str) -> Result<DatasetMeta, StoreError>;

    /// Full contents of a dataset as a dynamic-dimensional array.
    fn read_raw(&self, internal_path: &str) -> Result<RawArray, StoreError>;
}

// =============================================================================
// Introspection Types
// =============================================================================

/// Kind of a resolved node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A container holding named children
    Group,

    /// A typed, shaped array of values
    Dataset,

    /// Anything else the store reports, carried by its type tag
    Other(String),
}

impl NodeKind {
    /// Store-reported name of this kind.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Dataset => "Dataset",
            NodeKind::Other(tag) => tag,
        }
    }
}

/// An unresolved link as stored, soft or external.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Alias to another path within the same file
    Soft(String),

    /// Alias to a path inside a different file
    External { file: String, path: String },
}

/// Dataset metadata snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMeta {
    /// Extent of each dimension
    pub shape: Vec<usize>,

    /// Element type tag (e.g. `int32`, `float64`, `str`)
    pub dtype: String,

    /// Total number of elements
    pub size: usize,

    /// Chunk extent per dimension when the dataset is chunked
    pub chunks: Option<Vec<usize>>,
}

// =============================================================================
// Attribute Values
// =============================================================================

/// A scalar or small-array attribute value.
///
/// Serializes untagged so attribute maps render as plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    TextArray(Vec<String>),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Text(v) => write!(f, "{v}"),
            AttrValue::IntArray(vs) => write!(f, "{vs:?}"),
            AttrValue::FloatArray(vs) => write!(f, "{vs:?}"),
            AttrValue::TextArray(vs) => write!(f, "{vs:?}"),
        }
    }
}

// =============================================================================
// Raw Arrays and Axis Selection
// =============================================================================

/// One per-axis selection after ellipsis expansion.
///
/// Unlike [`crate::slice::SliceTerm`], a selector sequence never contains an
/// ellipsis and always has exactly one entry per dataset dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelector {
    /// Single index; negative counts from the end of the axis
    Index(i64),

    /// Range with clamped bounds; `None` parts fall back to axis defaults
    Range {
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
}

impl AxisSelector {
    /// Selector covering an entire axis.
    pub const fn full() -> Self {
        AxisSelector::Range {
            start: None,
            stop: None,
            step: None,
        }
    }

    fn to_elem(self) -> SliceInfoElem {
        match self {
            AxisSelector::Index(i) => SliceInfoElem::Index(i as isize),
            AxisSelector::Range { start, stop, step } => SliceInfoElem::Slice {
                start: start.unwrap_or(0) as isize,
                end: stop.map(|v| v as isize),
                step: step.unwrap_or(1) as isize,
            },
        }
    }
}

/// Dataset contents as a dynamic-dimensional array of one element class.
///
/// Integer-typed elements widen to `i64`, floats to `f64`; string elements
/// are decoded to owned text. The distinction between classes is preserved
/// all the way to the transport-neutral value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArray {
    Int(ArrayD<i64>),
    Float(ArrayD<f64>),
    Bool(ArrayD<bool>),
    Text(ArrayD<String>),
}

impl RawArray {
    /// Extent of each dimension.
    pub fn shape(&self) -> &[usize] {
        match self {
            RawArray::Int(a) => a.shape(),
            RawArray::Float(a) => a.shape(),
            RawArray::Bool(a) => a.shape(),
            RawArray::Text(a) => a.shape(),
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Build a 1-dimensional integer array.
    pub fn from_ints(values: Vec<i64>) -> Self {
        let shape = IxDyn(&[values.len()]);
        RawArray::Int(ArrayD::from_shape_vec(shape, values).expect("vector length matches shape"))
    }

    /// Build an integer array with an explicit shape.
    pub fn ints_with_shape(shape: &[usize], values: Vec<i64>) -> Result<Self, StoreError> {
        ArrayD::from_shape_vec(IxDyn(shape), values)
            .map(RawArray::Int)
            .map_err(|e| StoreError::SliceApplication {
                shape: shape.to_vec(),
                message: e.to_string(),
            })
    }

    /// Build a float array with an explicit shape.
    pub fn floats_with_shape(shape: &[usize], values: Vec<f64>) -> Result<Self, StoreError> {
        ArrayD::from_shape_vec(IxDyn(shape), values)
            .map(RawArray::Float)
            .map_err(|e| StoreError::SliceApplication {
                shape: shape.to_vec(),
                message: e.to_string(),
            })
    }

    /// Build a 1-dimensional string array.
    pub fn from_texts(values: Vec<String>) -> Self {
        let shape = IxDyn(&[values.len()]);
        RawArray::Text(ArrayD::from_shape_vec(shape, values).expect("vector length matches shape"))
    }

    /// Build a 0-dimensional (scalar) integer array.
    pub fn int_scalar(value: i64) -> Self {
        RawArray::Int(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// Build a 0-dimensional (scalar) float array.
    pub fn float_scalar(value: f64) -> Self {
        RawArray::Float(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// Apply one selector per dimension, clamping range bounds to the axis
    /// extents the way conventional array slicing does.
    ///
    /// The selector count must equal the array rank; integer indexes must be
    /// within `[-extent, extent)`; steps must be non-zero. Violations fail
    /// with [`StoreError::SliceApplication`] carrying the array shape.
    pub fn apply(&self, selectors: &[AxisSelector]) -> Result<RawArray, StoreError> {
        validate_selectors(selectors, self.shape())?;
        let elems: Vec<SliceInfoElem> = selectors.iter().map(|s| s.to_elem()).collect();
        match self {
            RawArray::Int(a) => slice_dyn(a.view(), &elems, self.shape()).map(RawArray::Int),
            RawArray::Float(a) => slice_dyn(a.view(), &elems, self.shape()).map(RawArray::Float),
            RawArray::Bool(a) => slice_dyn(a.view(), &elems, self.shape()).map(RawArray::Bool),
            RawArray::Text(a) => slice_dyn(a.view(), &elems, self.shape()).map(RawArray::Text),
        }
    }
}

fn validate_selectors(selectors: &[AxisSelector], shape: &[usize]) -> Result<(), StoreError> {
    if selectors.len() != shape.len() {
        return Err(StoreError::SliceApplication {
            shape: shape.to_vec(),
            message: format!(
                "expected {} selectors, got {}",
                shape.len(),
                selectors.len()
            ),
        });
    }
    for (axis, selector) in selectors.iter().enumerate() {
        let extent = shape[axis] as i64;
        match selector {
            AxisSelector::Index(i) => {
                if *i < -extent || *i >= extent {
                    return Err(StoreError::SliceApplication {
                        shape: shape.to_vec(),
                        message: format!(
                            "index {i} is out of bounds for axis {axis} with size {extent}"
                        ),
                    });
                }
            }
            AxisSelector::Range { step: Some(0), .. } => {
                return Err(StoreError::SliceApplication {
                    shape: shape.to_vec(),
                    message: "slice step cannot be zero".to_string(),
                });
            }
            AxisSelector::Range { .. } => {}
        }
    }
    Ok(())
}

fn slice_dyn<T: Clone>(
    view: ArrayViewD<'_, T>,
    elems: &[SliceInfoElem],
    shape: &[usize],
) -> Result<ArrayD<T>, StoreError> {
    let info: SliceInfo<&[SliceInfoElem], IxDyn, IxDyn> =
        SliceInfo::try_from(elems).map_err(|e| StoreError::SliceApplication {
            shape: shape.to_vec(),
            message: e.to_string(),
        })?;
    Ok(view.slice(info).to_owned())
}

// =============================================================================
// Tests
// =============================================================================

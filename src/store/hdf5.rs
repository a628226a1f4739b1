//! Native HDF5 store backend.
//!
//! Wraps the `hdf5` crate behind the [`DataStore`] / [`DataFile`] traits.
//! Link introspection drops to `hdf5-sys`, since the safe wrapper exposes no
//! way to inspect a link without following it.
//!
//! Every handle is read-only and closed when dropped; the HDF5 library
//! supports concurrent independent read-only handles to the same file.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint, c_void};
use std::path::{Path, PathBuf};

use hdf5::types::{FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Dataset, File, Location};
use hdf5_sys::h5l::{
    H5L_info_t, H5L_type_t, H5Lget_info, H5Lget_val, H5Lunpack_elink_val,
};
use hdf5_sys::h5p::H5P_DEFAULT;
use ndarray::ArrayD;

use crate::error::StoreError;

use super::{AttrValue, DataFile, DataStore, DatasetMeta, LinkTarget, NodeKind, RawArray};

// =============================================================================
// Hdf5Store
// =============================================================================

/// [`DataStore`] implementation backed by the HDF5 C library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Store;

impl Hdf5Store {
    pub fn new() -> Self {
        Self
    }
}

impl DataStore for Hdf5Store {
    type File = Hdf5File;

    fn open_read(&self, path: &Path) -> Result<Hdf5File, StoreError> {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| StoreError::Io {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Hdf5File {
            file,
            path: path.to_path_buf(),
        })
    }
}

// =============================================================================
// Hdf5File
// =============================================================================

/// Read-only handle on one HDF5 file.
pub struct Hdf5File {
    file: File,
    path: PathBuf,
}

impl Hdf5File {
    fn io_error(&self, message: impl Into<String>) -> StoreError {
        StoreError::Io {
            file: self.path.clone(),
            message: message.into(),
        }
    }

    /// `H5Lexists` requires every intermediate component to exist, so walk
    /// the path one component at a time.
    fn exists(&self, internal_path: &str) -> bool {
        if internal_path == "/" {
            return true;
        }
        let mut partial = String::new();
        for component in internal_path.trim_matches('/').split('/') {
            partial.push('/');
            partial.push_str(component);
            if !self.file.link_exists(&partial) {
                return false;
            }
        }
        true
    }

    fn dataset_at(&self, internal_path: &str) -> Result<Dataset, StoreError> {
        self.file
            .dataset(internal_path)
            .map_err(|e| self.io_error(e.to_string()))
    }
}

impl DataFile for Hdf5File {
    fn link_target(&self, internal_path: &str) -> Result<Option<LinkTarget>, StoreError> {
        if internal_path == "/" || !self.exists(internal_path) {
            return Ok(None);
        }
        let c_path = CString::new(internal_path).map_err(|e| self.io_error(e.to_string()))?;
        raw_link_target(self.file.id(), &c_path)
    }

    fn node_kind(&self, internal_path: &str) -> Result<Option<NodeKind>, StoreError> {
        if internal_path == "/" {
            return Ok(Some(NodeKind::Group));
        }
        if !self.exists(internal_path) {
            return Ok(None);
        }
        if self.file.dataset(internal_path).is_ok() {
            return Ok(Some(NodeKind::Dataset));
        }
        if self.file.group(internal_path).is_ok() {
            return Ok(Some(NodeKind::Group));
        }
        // a link that exists but cannot be opened is a dangling alias
        if self.link_target(internal_path)?.is_some() {
            return Ok(None);
        }
        Ok(Some(NodeKind::Other("NamedDatatype".to_string())))
    }

    fn attributes(&self, internal_path: &str) -> Result<Vec<(String, AttrValue)>, StoreError> {
        if internal_path == "/" {
            return Ok(read_attributes(&self.file));
        }
        if let Ok(dataset) = self.file.dataset(internal_path) {
            return Ok(read_attributes(&dataset));
        }
        if let Ok(group) = self.file.group(internal_path) {
            return Ok(read_attributes(&group));
        }
        Ok(Vec::new())
    }

    fn child_names(&self, internal_path: &str) -> Result<Vec<String>, StoreError> {
        if internal_path == "/" {
            return self
                .file
                .member_names()
                .map_err(|e| self.io_error(e.to_string()));
        }
        self.file
            .group(internal_path)
            .and_then(|group| group.member_names())
            .map_err(|e| self.io_error(e.to_string()))
    }

    fn dataset_meta(&self, internal_path: &str) -> Result<DatasetMeta, StoreError> {
        let dataset = self.dataset_at(internal_path)?;
        let dtype = dataset
            .dtype()
            .and_then(|dt| dt.to_descriptor())
            .map(|desc| dtype_tag(&desc))
            .unwrap_or_else(|_| "unknown".to_string());
        Ok(DatasetMeta {
            shape: dataset.shape(),
            dtype,
            size: dataset.size(),
            chunks: dataset.chunk(),
        })
    }

    fn read_raw(&self, internal_path: &str) -> Result<RawArray, StoreError> {
        let dataset = self.dataset_at(internal_path)?;
        let descriptor = dataset
            .dtype()
            .and_then(|dt| dt.to_descriptor())
            .map_err(|e| self.io_error(e.to_string()))?;

        match descriptor {
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) | TypeDescriptor::Enum(_) => {
                self.read_as::<i64>(&dataset).map(RawArray::Int)
            }
            TypeDescriptor::Float(_) => self.read_as::<f64>(&dataset).map(RawArray::Float),
            TypeDescriptor::Boolean => self.read_as::<bool>(&dataset).map(RawArray::Bool),
            TypeDescriptor::VarLenUnicode | TypeDescriptor::FixedUnicode(_) => self
                .read_as::<VarLenUnicode>(&dataset)
                .map(|a| RawArray::Text(a.mapv(|s| s.as_str().to_string()))),
            TypeDescriptor::VarLenAscii | TypeDescriptor::FixedAscii(_) => self
                .read_as::<VarLenAscii>(&dataset)
                .map(|a| RawArray::Text(a.mapv(|s| s.as_str().to_string()))),
            other => Err(self.io_error(format!(
                "unsupported element type: {}",
                dtype_tag(&other)
            ))),
        }
    }
}

impl Hdf5File {
    fn read_as<T: hdf5::H5Type + Clone>(&self, dataset: &Dataset) -> Result<ArrayD<T>, StoreError> {
        dataset
            .read_dyn::<T>()
            .map_err(|e| self.io_error(e.to_string()))
    }
}

// =============================================================================
// Attributes
// =============================================================================

fn read_attributes(location: &Location) -> Vec<(String, AttrValue)> {
    let names = location.attr_names().unwrap_or_default();
    let mut attributes = Vec::with_capacity(names.len());
    for name in names {
        let Ok(attr) = location.attr(&name) else {
            continue;
        };
        if let Some(value) = read_attr_value(&attr) {
            attributes.push((name, value));
        }
    }
    attributes
}

/// Decode one attribute to a scalar or 1-d array value.
///
/// Unsupported element classes (compound, reference, nested arrays) are
/// skipped rather than failing the whole query.
fn read_attr_value(attr: &Attribute) -> Option<AttrValue> {
    let descriptor = attr.dtype().ok()?.to_descriptor().ok()?;

    if attr.ndim() == 0 {
        return match descriptor {
            TypeDescriptor::Integer(_) | TypeDescriptor::Enum(_) => {
                attr.read_scalar::<i64>().ok().map(AttrValue::Int)
            }
            TypeDescriptor::Unsigned(_) => attr
                .read_scalar::<u64>()
                .ok()
                .map(|v| AttrValue::Int(v as i64)),
            TypeDescriptor::Float(_) => attr.read_scalar::<f64>().ok().map(AttrValue::Float),
            TypeDescriptor::Boolean => attr.read_scalar::<bool>().ok().map(AttrValue::Bool),
            TypeDescriptor::VarLenUnicode | TypeDescriptor::FixedUnicode(_) => attr
                .read_scalar::<VarLenUnicode>()
                .ok()
                .map(|s| AttrValue::Text(s.as_str().to_string())),
            TypeDescriptor::VarLenAscii | TypeDescriptor::FixedAscii(_) => attr
                .read_scalar::<VarLenAscii>()
                .ok()
                .map(|s| AttrValue::Text(s.as_str().to_string())),
            _ => None,
        };
    }

    if attr.ndim() == 1 {
        return match descriptor {
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => attr
                .read_1d::<i64>()
                .ok()
                .map(|a| AttrValue::IntArray(a.to_vec())),
            TypeDescriptor::Float(_) => attr
                .read_1d::<f64>()
                .ok()
                .map(|a| AttrValue::FloatArray(a.to_vec())),
            TypeDescriptor::VarLenUnicode | TypeDescriptor::FixedUnicode(_) => {
                attr.read_1d::<VarLenUnicode>().ok().map(|a| {
                    AttrValue::TextArray(a.iter().map(|s| s.as_str().to_string()).collect())
                })
            }
            _ => None,
        };
    }

    None
}

// =============================================================================
// Element Type Tags
// =============================================================================

fn dtype_tag(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Integer(IntSize::U1) => "int8".to_string(),
        TypeDescriptor::Integer(IntSize::U2) => "int16".to_string(),
        TypeDescriptor::Integer(IntSize::U4) => "int32".to_string(),
        TypeDescriptor::Integer(IntSize::U8) => "int64".to_string(),
        TypeDescriptor::Unsigned(IntSize::U1) => "uint8".to_string(),
        TypeDescriptor::Unsigned(IntSize::U2) => "uint16".to_string(),
        TypeDescriptor::Unsigned(IntSize::U4) => "uint32".to_string(),
        TypeDescriptor::Unsigned(IntSize::U8) => "uint64".to_string(),
        TypeDescriptor::Float(FloatSize::U4) => "float32".to_string(),
        TypeDescriptor::Float(FloatSize::U8) => "float64".to_string(),
        TypeDescriptor::Boolean => "bool".to_string(),
        TypeDescriptor::VarLenUnicode
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::FixedUnicode(_)
        | TypeDescriptor::FixedAscii(_) => "str".to_string(),
        TypeDescriptor::Enum(_) => "enum".to_string(),
        TypeDescriptor::Compound(_) => "compound".to_string(),
        TypeDescriptor::FixedArray(_, _) | TypeDescriptor::VarLenArray(_) => "array".to_string(),
        other => format!("{other:?}"),
    }
}

// =============================================================================
// Raw Link Introspection
// =============================================================================

/// Query link information at a path without following the link.
fn raw_link_target(loc_id: hdf5_sys::h5i::hid_t, c_path: &CStr) -> Result<Option<LinkTarget>, StoreError> {
    unsafe {
        let mut info: H5L_info_t = std::mem::zeroed();
        if H5Lget_info(loc_id, c_path.as_ptr(), &mut info, H5P_DEFAULT) < 0 {
            return Ok(None);
        }

        match info.type_ {
            H5L_type_t::H5L_TYPE_SOFT => {
                let value = read_link_value(loc_id, c_path, info.u.val_size as usize)?;
                let target = CStr::from_bytes_until_nul(&value)
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(Some(LinkTarget::Soft(target)))
            }
            H5L_type_t::H5L_TYPE_EXTERNAL => {
                let value = read_link_value(loc_id, c_path, info.u.val_size as usize)?;
                let mut flags: c_uint = 0;
                let mut file_ptr: *const c_char = std::ptr::null();
                let mut path_ptr: *const c_char = std::ptr::null();
                let status = H5Lunpack_elink_val(
                    value.as_ptr() as *const c_void,
                    value.len(),
                    &mut flags,
                    &mut file_ptr,
                    &mut path_ptr,
                );
                if status < 0 || file_ptr.is_null() || path_ptr.is_null() {
                    return Ok(None);
                }
                Ok(Some(LinkTarget::External {
                    file: CStr::from_ptr(file_ptr).to_string_lossy().into_owned(),
                    path: CStr::from_ptr(path_ptr).to_string_lossy().into_owned(),
                }))
            }
            _ => Ok(None),
        }
    }
}

unsafe fn read_link_value(
    loc_id: hdf5_sys::h5i::hid_t,
    c_path: &CStr,
    val_size: usize,
) -> Result<Vec<u8>, StoreError> {
    let mut buffer = vec![0u8; val_size.max(1)];
    let status = H5Lget_val(
        loc_id,
        c_path.as_ptr(),
        buffer.as_mut_ptr() as *mut c_void,
        buffer.len(),
        H5P_DEFAULT,
    );
    if status < 0 {
        return Err(StoreError::Io {
            file: PathBuf::new(),
            message: "H5Lget_val failed".to_string(),
        });
    }
    Ok(buffer)
}

//! Object descriptors and the describe operation.
//!
//! [`ObjectInfo`] is a closed tagged union: each variant carries exactly the
//! fields that exist for its kind, so there is no "field present only for
//! type X" ambiguity to check at runtime. Descriptors are built fresh per
//! query, never cached, and never mutated after construction.

use std::path::Path;

use serde::Serialize;

use crate::error::StoreError;
use crate::store::{AttrValue, DataFile, DataStore, LinkTarget, NodeKind};

/// Kind of a link descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkKind {
    Soft,
    External,
}

impl LinkKind {
    /// Store-style name of this link kind.
    pub fn name(&self) -> &'static str {
        match self {
            LinkKind::Soft => "SoftLink",
            LinkKind::External => "ExternalLink",
        }
    }
}

/// Normalized metadata for one addressed object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ObjectInfo {
    /// A container with ordered attributes and immediate child names
    Group {
        attributes: Vec<(String, AttrValue)>,
        members: Vec<String>,
    },

    /// A typed, shaped array of values
    Dataset {
        attributes: Vec<(String, AttrValue)>,
        shape: Vec<usize>,
        dtype: String,
        size: usize,
        chunks: Option<Vec<usize>>,
    },

    /// An unresolved link; external targets format as `<file>:<path>`
    Link { kind: LinkKind, target: String },

    /// Any other store-reported kind, carried with its type tag
    Other {
        type_name: String,
        attributes: Vec<(String, AttrValue)>,
    },
}

impl ObjectInfo {
    /// Human-readable kind name used in summaries and error messages.
    pub fn kind_name(&self) -> &str {
        match self {
            ObjectInfo::Group { .. } => "Group",
            ObjectInfo::Dataset { .. } => "Dataset",
            ObjectInfo::Link { kind, .. } => kind.name(),
            ObjectInfo::Other { type_name, .. } => type_name,
        }
    }
}

/// Build a descriptor for the object at `internal_path` inside `file_path`.
///
/// Links are reported as found, without following them. "Not found"
/// conditions surface as [`StoreError::PathNotFound`] naming both the
/// internal path and the file, so callers can tell addressing mistakes from
/// storage failures.
pub fn describe<S: DataStore>(
    store: &S,
    file_path: &Path,
    internal_path: &str,
) -> Result<ObjectInfo, StoreError> {
    let file = store.open_read(file_path)?;

    if let Some(link) = file.link_target(internal_path)? {
        return Ok(match link {
            LinkTarget::Soft(target) => ObjectInfo::Link {
                kind: LinkKind::Soft,
                target,
            },
            LinkTarget::External { file, path } => ObjectInfo::Link {
                kind: LinkKind::External,
                target: format!("{file}:{path}"),
            },
        });
    }

    let kind = file
        .node_kind(internal_path)?
        .ok_or_else(|| StoreError::PathNotFound {
            path: internal_path.to_string(),
            file: file_path.to_path_buf(),
        })?;

    match kind {
        NodeKind::Group => Ok(ObjectInfo::Group {
            attributes: file.attributes(internal_path)?,
            members: file.child_names(internal_path)?,
        }),
        NodeKind::Dataset => {
            let meta = file.dataset_meta(internal_path)?;
            Ok(ObjectInfo::Dataset {
                attributes: file.attributes(internal_path)?,
                shape: meta.shape,
                dtype: meta.dtype,
                size: meta.size,
                chunks: meta.chunks,
            })
        }
        NodeKind::Other(type_name) => Ok(ObjectInfo::Other {
            type_name,
            attributes: file.attributes(internal_path).unwrap_or_default(),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryFile, MemoryStore, RawArray};

    fn sample_store() -> MemoryStore {
        MemoryStore::new().with_file(
            "/data/sample.h5",
            MemoryFile::new()
                .root_attrs(vec![("title".into(), AttrValue::Text("test file".into()))])
                .dataset_with(
                    "/data",
                    RawArray::from_ints(vec![0, 1, 2, 3, 4]),
                    vec![("units".into(), AttrValue::Text("counts".into()))],
                    Some(vec![2]),
                )
                .group("/experiment")
                .soft_link("/alias", "/data")
                .external_link("/remote", "/other.h5", "/data")
                .opaque("/dtype", "NamedDatatype"),
        )
    }

    fn sample_path() -> &'static Path {
        Path::new("/data/sample.h5")
    }

    #[test]
    fn test_describe_root_group() {
        let info = describe(&sample_store(), sample_path(), "/").unwrap();
        match info {
            ObjectInfo::Group {
                attributes,
                members,
            } => {
                assert_eq!(
                    attributes,
                    vec![("title".to_string(), AttrValue::Text("test file".into()))]
                );
                assert_eq!(members, vec!["data", "experiment", "alias", "remote", "dtype"]);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_dataset() {
        let info = describe(&sample_store(), sample_path(), "/data").unwrap();
        match info {
            ObjectInfo::Dataset {
                shape,
                dtype,
                size,
                chunks,
                attributes,
            } => {
                assert_eq!(shape, vec![5]);
                assert_eq!(dtype, "int64");
                assert_eq!(size, 5);
                assert_eq!(chunks, Some(vec![2]));
                assert_eq!(attributes.len(), 1);
            }
            other => panic!("expected dataset, got {other:?}"),
        }
    }

    #[test]
    fn test_element_count_is_shape_product() {
        let store = MemoryStore::new().with_file(
            "/m.h5",
            MemoryFile::new().dataset(
                "/grid",
                RawArray::ints_with_shape(&[2, 3], vec![0, 1, 2, 3, 4, 5]).unwrap(),
            ),
        );
        match describe(&store, Path::new("/m.h5"), "/grid").unwrap() {
            ObjectInfo::Dataset { shape, size, .. } => {
                assert_eq!(size, shape.iter().product::<usize>());
            }
            other => panic!("expected dataset, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_soft_link_is_not_followed() {
        let info = describe(&sample_store(), sample_path(), "/alias").unwrap();
        assert_eq!(
            info,
            ObjectInfo::Link {
                kind: LinkKind::Soft,
                target: "/data".to_string(),
            }
        );
    }

    #[test]
    fn test_describe_external_link_formats_target() {
        let info = describe(&sample_store(), sample_path(), "/remote").unwrap();
        assert_eq!(
            info,
            ObjectInfo::Link {
                kind: LinkKind::External,
                target: "/other.h5:/data".to_string(),
            }
        );
    }

    #[test]
    fn test_describe_other_kind_is_not_an_error() {
        let info = describe(&sample_store(), sample_path(), "/dtype").unwrap();
        assert_eq!(info.kind_name(), "NamedDatatype");
    }

    #[test]
    fn test_describe_missing_file() {
        let err = describe(&sample_store(), Path::new("/nope.h5"), "/").unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound(_)));
    }

    #[test]
    fn test_describe_missing_path() {
        let err = describe(&sample_store(), sample_path(), "/nope").unwrap_err();
        match err {
            StoreError::PathNotFound { path, file } => {
                assert_eq!(path, "/nope");
                assert_eq!(file, sample_path());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

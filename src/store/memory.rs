//! In-memory store backend.
//!
//! `MemoryStore` serves hand-built file trees from a map, with the same
//! observable behavior as the native backend: ordered children, link-aware
//! lookups, clamped reads. It backs the unit and integration tests and the
//! documentation examples, which would otherwise all need real HDF5 files on
//! disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::{AttrValue, DataFile, DataStore, DatasetMeta, LinkTarget, NodeKind, RawArray};

/// Soft links may chain; resolution gives up after this many hops.
const MAX_LINK_HOPS: usize = 8;

// =============================================================================
// MemoryStore
// =============================================================================

/// A [`DataStore`] serving in-memory file trees.
///
/// # Example
///
/// ```
/// use h5_bridge::store::{DataStore, MemoryFile, MemoryStore, RawArray};
///
/// let store = MemoryStore::new().with_file(
///     "/data/sample.h5",
///     MemoryFile::new().dataset("/data", RawArray::from_ints(vec![0, 1, 2, 3, 4])),
/// );
/// assert!(store.open_read("/data/sample.h5".as_ref()).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<PathBuf, MemoryFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under a path.
    pub fn with_file(mut self, path: impl Into<PathBuf>, file: MemoryFile) -> Self {
        self.files.insert(path.into(), file);
        self
    }
}

impl DataStore for MemoryStore {
    type File = MemoryFile;

    fn open_read(&self, path: &Path) -> Result<MemoryFile, StoreError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::FileNotFound(path.to_path_buf()))
    }
}

// =============================================================================
// MemoryFile
// =============================================================================

#[derive(Debug, Clone)]
enum MemoryNode {
    Group {
        attributes: Vec<(String, AttrValue)>,
    },
    Dataset {
        attributes: Vec<(String, AttrValue)>,
        data: RawArray,
        chunks: Option<Vec<usize>>,
    },
    SoftLink {
        target: String,
    },
    ExternalLink {
        file: String,
        path: String,
    },
    Opaque {
        type_name: String,
        attributes: Vec<(String, AttrValue)>,
    },
}

/// One in-memory hierarchical file, built fluently.
///
/// Nodes keep insertion order, which is the order child names are reported
/// in. The root group `/` always exists.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    nodes: Vec<(String, MemoryNode)>,
}

impl MemoryFile {
    pub fn new() -> Self {
        Self {
            nodes: vec![(
                "/".to_string(),
                MemoryNode::Group {
                    attributes: Vec::new(),
                },
            )],
        }
    }

    /// Attach attributes to the root group.
    pub fn root_attrs(self, attributes: Vec<(String, AttrValue)>) -> Self {
        self.replace("/", MemoryNode::Group { attributes })
    }

    /// Add an empty group.
    pub fn group(self, path: &str) -> Self {
        self.group_with_attrs(path, Vec::new())
    }

    /// Add a group with attributes.
    pub fn group_with_attrs(self, path: &str, attributes: Vec<(String, AttrValue)>) -> Self {
        self.insert(path, MemoryNode::Group { attributes })
    }

    /// Add a contiguous dataset.
    pub fn dataset(self, path: &str, data: RawArray) -> Self {
        self.dataset_with(path, data, Vec::new(), None)
    }

    /// Add a dataset with attributes and optional chunking.
    pub fn dataset_with(
        self,
        path: &str,
        data: RawArray,
        attributes: Vec<(String, AttrValue)>,
        chunks: Option<Vec<usize>>,
    ) -> Self {
        self.insert(
            path,
            MemoryNode::Dataset {
                attributes,
                data,
                chunks,
            },
        )
    }

    /// Add a soft link to another path in the same file.
    pub fn soft_link(self, path: &str, target: &str) -> Self {
        self.insert(
            path,
            MemoryNode::SoftLink {
                target: target.to_string(),
            },
        )
    }

    /// Add an external link to a path in another file.
    pub fn external_link(self, path: &str, file: &str, target_path: &str) -> Self {
        self.insert(
            path,
            MemoryNode::ExternalLink {
                file: file.to_string(),
                path: target_path.to_string(),
            },
        )
    }

    /// Add a node of an arbitrary store-reported kind.
    pub fn opaque(self, path: &str, type_name: &str) -> Self {
        self.insert(
            path,
            MemoryNode::Opaque {
                type_name: type_name.to_string(),
                attributes: Vec::new(),
            },
        )
    }

    fn insert(mut self, path: &str, node: MemoryNode) -> Self {
        self.nodes.push((normalize(path), node));
        self
    }

    fn replace(mut self, path: &str, node: MemoryNode) -> Self {
        let path = normalize(path);
        if let Some(slot) = self.nodes.iter_mut().find(|(p, _)| *p == path) {
            slot.1 = node;
        } else {
            self.nodes.push((path, node));
        }
        self
    }

    fn node_at(&self, path: &str) -> Option<&MemoryNode> {
        self.nodes.iter().find(|(p, _)| p == path).map(|(_, n)| n)
    }

    /// Follow soft links until a concrete node or a dead end.
    fn resolve<'a>(&'a self, path: &str) -> Option<&'a MemoryNode> {
        let mut current = normalize(path);
        for _ in 0..MAX_LINK_HOPS {
            match self.node_at(&current)? {
                MemoryNode::SoftLink { target } => current = normalize(target),
                node => return Some(node),
            }
        }
        None
    }
}

impl Default for MemoryFile {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFile for MemoryFile {
    fn link_target(&self, internal_path: &str) -> Result<Option<LinkTarget>, StoreError> {
        Ok(match self.node_at(&normalize(internal_path)) {
            Some(MemoryNode::SoftLink { target }) => Some(LinkTarget::Soft(target.clone())),
            Some(MemoryNode::ExternalLink { file, path }) => Some(LinkTarget::External {
                file: file.clone(),
                path: path.clone(),
            }),
            _ => None,
        })
    }

    fn node_kind(&self, internal_path: &str) -> Result<Option<NodeKind>, StoreError> {
        Ok(self.resolve(internal_path).map(|node| match node {
            MemoryNode::Group { .. } => NodeKind::Group,
            MemoryNode::Dataset { .. } => NodeKind::Dataset,
            MemoryNode::Opaque { type_name, .. } => NodeKind::Other(type_name.clone()),
            // external links cross file boundaries and stay unresolved in memory
            MemoryNode::SoftLink { .. } | MemoryNode::ExternalLink { .. } => {
                NodeKind::Other("Link".to_string())
            }
        }))
    }

    fn attributes(&self, internal_path: &str) -> Result<Vec<(String, AttrValue)>, StoreError> {
        Ok(match self.resolve(internal_path) {
            Some(MemoryNode::Group { attributes })
            | Some(MemoryNode::Dataset { attributes, .. })
            | Some(MemoryNode::Opaque { attributes, .. }) => attributes.clone(),
            _ => Vec::new(),
        })
    }

    fn child_names(&self, internal_path: &str) -> Result<Vec<String>, StoreError> {
        let base = normalize(internal_path);
        let prefix = if base == "/" {
            "/".to_string()
        } else {
            format!("{base}/")
        };
        Ok(self
            .nodes
            .iter()
            .filter_map(|(path, _)| {
                let rest = path.strip_prefix(&prefix)?;
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect())
    }

    fn dataset_meta(&self, internal_path: &str) -> Result<DatasetMeta, StoreError> {
        match self.resolve(internal_path) {
            Some(MemoryNode::Dataset { data, chunks, .. }) => Ok(DatasetMeta {
                shape: data.shape().to_vec(),
                dtype: dtype_tag(data).to_string(),
                size: data.shape().iter().product(),
                chunks: chunks.clone(),
            }),
            _ => Err(StoreError::PathNotFound {
                path: normalize(internal_path),
                file: PathBuf::from("<memory>"),
            }),
        }
    }

    fn read_raw(&self, internal_path: &str) -> Result<RawArray, StoreError> {
        match self.resolve(internal_path) {
            Some(MemoryNode::Dataset { data, .. }) => Ok(data.clone()),
            _ => Err(StoreError::PathNotFound {
                path: normalize(internal_path),
                file: PathBuf::from("<memory>"),
            }),
        }
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn dtype_tag(data: &RawArray) -> &'static str {
    match data {
        RawArray::Int(_) => "int64",
        RawArray::Float(_) => "float64",
        RawArray::Bool(_) => "bool",
        RawArray::Text(_) => "str",
    }
}

// =============================================================================
// Tests
// =============================================================================

//! # h5-bridge
//!
//! An MCP server for HDF5 files.
//!
//! This library exposes hierarchical scientific-data files to automated
//! agents through a uniform addressing scheme and a safe, bounded
//! data-access protocol. Files are addressed by a custom `h5://` URI scheme
//! and datasets are read through a NumPy-style slice grammar that is parsed
//! by hand: slice strings come from an untrusted caller and never reach an
//! expression evaluator.
//!
//! ## Features
//!
//! - **h5:// addressing**: round-trip-safe mapping between URIs and
//!   (file, internal-path) pairs
//! - **Eval-free slicing**: a closed grammar for `"0:10, :, 5"`-style slice
//!   strings, with clamped bounds and scalar collapse
//! - **Typed descriptors**: groups, datasets and links as a closed tagged
//!   union, never a bag of optional fields
//! - **Pluggable store**: the core talks to a narrow trait; backends exist
//!   for the HDF5 C library and for in-memory test fixtures
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`uri`] - the `h5://` URI codec
//! - [`slice`] - the slice-string grammar
//! - [`store`] - store traits plus the HDF5 and in-memory backends
//! - [`object`] - object descriptors and the describe operation
//! - [`data`] - bounded dataset reads and the JSON value tree
//! - [`scan`] - the startup directory scan
//! - [`server`] - MCP handlers and stdio wiring
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```
//! use h5_bridge::slice::parse_slice;
//! use h5_bridge::store::{MemoryFile, MemoryStore, RawArray};
//! use h5_bridge::uri::parse_uri;
//!
//! let store = MemoryStore::new().with_file(
//!     "/data/run.h5",
//!     MemoryFile::new().dataset("/data", RawArray::from_ints(vec![0, 1, 2, 3, 4])),
//! );
//!
//! let address = parse_uri("h5:///data/run.h5?path=/data").unwrap();
//! let terms = parse_slice("1:4").unwrap();
//! let value =
//!     h5_bridge::data::read_dataset_slice(&store, &address.file_path, &address.internal_path, &terms)
//!         .unwrap();
//! assert_eq!(serde_json::to_string(&value).unwrap(), "[1,2,3]");
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod object;
pub mod scan;
pub mod server;
pub mod slice;
pub mod store;
pub mod uri;

// Re-export commonly used types
pub use config::Config;
pub use data::{read_dataset_slice, SlicedValue};
pub use error::{RequestError, ScanError, SliceError, StoreError, UriError};
pub use object::{describe, LinkKind, ObjectInfo};
pub use scan::scan_for_files;
pub use server::{H5BridgeService, ReadDatasetSliceRequest, ResourceEntry};
pub use slice::{parse_slice, SliceTerm};
pub use store::{
    AttrValue, AxisSelector, DataFile, DataStore, DatasetMeta, Hdf5Store, LinkTarget, MemoryFile,
    MemoryStore, NodeKind, RawArray,
};
pub use uri::{build_uri, parse_uri, Address};

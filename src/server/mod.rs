//! MCP server layer.
//!
//! Split in two the way the rest of the crate separates policy from
//! plumbing: [`handlers`] holds the pure request logic (decode, describe,
//! read, format) and [`mcp`] adapts it to the protocol types and the stdio
//! transport.

pub mod handlers;
pub mod mcp;

pub use handlers::{
    format_object, list_resources, read_resource, slice_dataset, ResourceEntry, HDF5_MIME_TYPE,
};
pub use mcp::{H5BridgeService, ReadDatasetSliceRequest};

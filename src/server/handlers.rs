//! Protocol request handlers.
//!
//! Pure functions behind the MCP wiring: they decode addresses, call the
//! describe/read core against any [`DataStore`], and render the results as
//! human-readable text or JSON. Keeping them free of protocol types makes
//! them directly testable against the in-memory store.

use std::path::PathBuf;

use crate::data::read_dataset_slice;
use crate::error::RequestError;
use crate::object::{describe, ObjectInfo};
use crate::slice::parse_slice;
use crate::store::{AttrValue, DataStore};
use crate::uri::{build_uri, parse_uri, Address};

/// MIME type advertised for HDF5 file resources.
pub const HDF5_MIME_TYPE: &str = "application/x-hdf5";

// =============================================================================
// Resource Listing
// =============================================================================

/// One listable file resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Root address of the file (`h5://<file>?path=/`)
    pub uri: String,

    /// File basename
    pub name: String,

    /// Short human-readable description
    pub description: String,

    /// Always [`HDF5_MIME_TYPE`]
    pub mime_type: &'static str,
}

/// Build the resource list for the scanned files, one entry per file root.
pub fn list_resources(files: &[PathBuf]) -> Vec<ResourceEntry> {
    files
        .iter()
        .filter_map(|file| {
            let uri = build_uri(&file.to_string_lossy(), "/").ok()?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string_lossy().into_owned());
            Some(ResourceEntry {
                uri,
                description: format!("HDF5 file: {name}"),
                name,
                mime_type: HDF5_MIME_TYPE,
            })
        })
        .collect()
}

// =============================================================================
// Resource Reading
// =============================================================================

/// Describe the object at `uri` and render a text summary.
pub fn read_resource<S: DataStore>(store: &S, uri: &str) -> Result<String, RequestError> {
    let address = parse_uri(uri)?;
    let info = describe(store, &address.file_path, &address.internal_path)?;
    Ok(format_object(&info, &address))
}

/// Render an object descriptor as the text returned for a resource read.
pub fn format_object(info: &ObjectInfo, address: &Address) -> String {
    match info {
        ObjectInfo::Group {
            attributes,
            members,
        } => format_group(attributes, members, address),
        ObjectInfo::Dataset {
            attributes,
            shape,
            dtype,
            size,
            chunks,
        } => format_dataset(attributes, shape, dtype, *size, chunks.as_deref(), address),
        ObjectInfo::Link { kind, target } => format_link(kind.name(), target, address),
        ObjectInfo::Other {
            type_name,
            attributes,
        } => format_other(type_name, attributes, address),
    }
}

fn header_lines(kind: &str, address: &Address) -> Vec<String> {
    vec![
        format!("HDF5 {kind}: {}", address.internal_path),
        format!("File: {}", address.file_path.display()),
    ]
}

fn push_attribute_block(lines: &mut Vec<String>, attributes: &[(String, AttrValue)]) {
    if attributes.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Attributes:".to_string());
    for (key, value) in attributes {
        lines.push(format!("  {key}: {value}"));
    }
}

fn format_group(
    attributes: &[(String, AttrValue)],
    members: &[String],
    address: &Address,
) -> String {
    let mut lines = header_lines("Group", address);
    lines.push(String::new());
    lines.push(format!("Members ({}):", members.len()));

    if members.is_empty() {
        lines.push("  (no members)".to_string());
    } else {
        for member in members {
            lines.push(format!("  - {member} ({})", address.child(member)));
        }
    }

    push_attribute_block(&mut lines, attributes);
    lines.join("\n")
}

fn format_dataset(
    attributes: &[(String, AttrValue)],
    shape: &[usize],
    dtype: &str,
    size: usize,
    chunks: Option<&[usize]>,
    address: &Address,
) -> String {
    let mut lines = header_lines("Dataset", address);
    lines.push(String::new());
    lines.push(format!("Shape: {shape:?}"));
    lines.push(format!("Data type: {dtype}"));
    lines.push(format!("Size: {size} elements"));
    if let Some(chunks) = chunks {
        lines.push(format!("Chunks: {chunks:?}"));
    }

    push_attribute_block(&mut lines, attributes);

    lines.push(String::new());
    lines.push(format!(
        "To read data, use the read_dataset_slice tool with URI: {address}"
    ));
    lines.join("\n")
}

fn format_link(kind: &str, target: &str, address: &Address) -> String {
    let mut lines = header_lines(kind, address);
    lines.push(String::new());
    lines.push(format!("Target: {target}"));
    lines.join("\n")
}

fn format_other(
    type_name: &str,
    attributes: &[(String, AttrValue)],
    address: &Address,
) -> String {
    let mut lines = header_lines(type_name, address);
    push_attribute_block(&mut lines, attributes);
    lines.join("\n")
}

// =============================================================================
// Dataset Slicing Tool
// =============================================================================

/// Execute the dataset-slicing tool: decode the address, parse the slice
/// string, read the data, and pretty-print it as JSON.
pub fn slice_dataset<S: DataStore>(
    store: &S,
    uri: &str,
    slice_str: &str,
) -> Result<String, RequestError> {
    let address = parse_uri(uri)?;
    let terms = parse_slice(slice_str)?;
    let value = read_dataset_slice(store, &address.file_path, &address.internal_path, &terms)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

// =============================================================================
// Tests
// =============================================================================

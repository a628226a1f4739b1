//! Parsing and building of the custom `h5://` URI scheme.
//!
//! An address has the form `h5://<absolute-file-path>?path=<internal-path>`,
//! mapping a flat URI string onto a (file, object-within-file) pair:
//!
//! ```text
//! h5:///data/run42.h5?path=/raw/detector_0
//!      └────┬───────┘      └──────┬──────┘
//!       file on disk        object inside the file
//! ```
//!
//! The grammar is closed and hand-parsed: addresses come from an untrusted
//! automated caller, so anything that does not match the scheme exactly is
//! rejected with a [`UriError`] rather than being guessed at. Parsing performs
//! no I/O and never touches the filesystem.

use std::fmt;
use std::path::PathBuf;

use crate::error::UriError;

/// Scheme token expected before `://`.
pub const URI_SCHEME: &str = "h5";

// =============================================================================
// Address
// =============================================================================

/// A decoded `h5://` address: a file on disk plus a path inside it.
///
/// `internal_path` always carries a leading `/`; the empty string normalizes
/// to `/` (the file root). Addresses are immutable value types constructed by
/// [`parse_uri`] or by composing a base address with [`Address::child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Absolute path of the HDF5 file on the filesystem
    pub file_path: PathBuf,

    /// Path of the object inside the file, always starting with `/`
    pub internal_path: String,
}

impl Address {
    /// Create an address, normalizing the internal path to a leading `/`.
    pub fn new(file_path: impl Into<PathBuf>, internal_path: &str) -> Self {
        Self {
            file_path: file_path.into(),
            internal_path: normalize_internal_path(internal_path),
        }
    }

    /// Address of a named child under this object.
    pub fn child(&self, name: &str) -> Self {
        let base = self.internal_path.trim_end_matches('/');
        Self {
            file_path: self.file_path.clone(),
            internal_path: format!("{base}/{name}"),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{URI_SCHEME}://{}?path={}",
            self.file_path.display(),
            encode_internal_path(&self.internal_path)
        )
    }
}

/// Ensure an internal path carries a leading `/`; empty becomes `/`.
pub fn normalize_internal_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Percent-encode an internal path, leaving `/` separators unescaped.
fn encode_internal_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse an `h5://` URI string into an [`Address`].
///
/// Fails with [`UriError`] when the string is empty, the scheme is not `h5`,
/// the file component is empty or relative, or the `path` query parameter is
/// missing or empty after percent-decoding.
///
/// # Examples
///
/// ```
/// use h5_bridge::uri::parse_uri;
///
/// let address = parse_uri("h5:///data/file.h5?path=/group1/dataset").unwrap();
/// assert_eq!(address.file_path.to_str(), Some("/data/file.h5"));
/// assert_eq!(address.internal_path, "/group1/dataset");
/// ```
pub fn parse_uri(uri_str: &str) -> Result<Address, UriError> {
    if uri_str.is_empty() {
        return Err(UriError::Empty);
    }

    let (scheme, rest) = uri_str
        .split_once("://")
        .ok_or_else(|| UriError::InvalidScheme(scheme_token(uri_str)))?;
    if scheme != URI_SCHEME {
        return Err(UriError::InvalidScheme(scheme.to_string()));
    }

    let (file_part, query) = match rest.split_once('?') {
        Some((file, query)) => (file, Some(query)),
        None => (rest, None),
    };

    if file_part.is_empty() {
        return Err(UriError::MissingFilePath);
    }
    if !file_part.starts_with('/') {
        return Err(UriError::RelativeFilePath(file_part.to_string()));
    }

    let raw_path = query
        .and_then(find_path_param)
        .ok_or(UriError::MissingPathParam)?;

    let decoded = urlencoding::decode(raw_path)
        .map_err(|e| UriError::InvalidEncoding(e.to_string()))?;
    if decoded.is_empty() {
        return Err(UriError::EmptyPathParam);
    }

    Ok(Address::new(file_part, &decoded))
}

/// Everything before `://`, or the whole string if no separator is present.
fn scheme_token(uri_str: &str) -> String {
    uri_str.split("://").next().unwrap_or_default().to_string()
}

/// First `path=` value in a query string; later duplicates are ignored.
fn find_path_param(query: &str) -> Option<&str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "path").then_some(value)
    })
}

// =============================================================================
// Building
// =============================================================================

/// Build an `h5://` URI string from a file path and an internal path.
///
/// The internal path is normalized to a leading `/` and percent-encoded with
/// `/` separators preserved. Output is deterministic.
///
/// # Examples
///
/// ```
/// use h5_bridge::uri::build_uri;
///
/// let uri = build_uri("/data/file.h5", "/group1/dataset").unwrap();
/// assert_eq!(uri, "h5:///data/file.h5?path=/group1/dataset");
/// ```
pub fn build_uri(file_path: &str, internal_path: &str) -> Result<String, UriError> {
    if file_path.is_empty() {
        return Err(UriError::EmptyFilePath);
    }
    Ok(Address::new(file_path, internal_path).to_string())
}

// =============================================================================
// Tests
// =============================================================================

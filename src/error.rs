use std::path::PathBuf;

use thiserror::Error;

/// Errors produced when parsing or building `h5://` URIs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// The URI string was empty
    #[error("URI string cannot be empty")]
    Empty,

    /// The scheme token before `://` was not `h5`
    #[error("invalid scheme '{0}', expected 'h5'")]
    InvalidScheme(String),

    /// No file path component between `://` and `?`
    #[error("missing file path in URI")]
    MissingFilePath,

    /// The file path component did not start with `/`
    #[error("file path must be absolute: '{0}'")]
    RelativeFilePath(String),

    /// The query string had no `path` key
    #[error("missing required 'path' query parameter")]
    MissingPathParam,

    /// The `path` query parameter was empty after percent-decoding
    #[error("empty 'path' query parameter")]
    EmptyPathParam,

    /// The `path` query parameter was not valid percent-encoded UTF-8
    #[error("invalid percent-encoding in 'path' parameter: {0}")]
    InvalidEncoding(String),

    /// An empty file path was passed to the URI builder
    #[error("file path cannot be empty")]
    EmptyFilePath,
}

/// Errors produced by the slice-string grammar.
///
/// The parser recognizes a closed grammar and rejects anything it cannot
/// unambiguously interpret. Each variant names the grammar rule that was
/// violated so callers can tell the failure modes apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    /// A comma-separated component was empty after trimming (e.g. `"0:10, , 5"`)
    #[error("empty slice component")]
    EmptyComponent,

    /// A component contained more than two `:` separators
    #[error("too many ':' in slice component: '{0}'")]
    TooManyColons(String),

    /// A `:`-separated part was neither empty nor a valid signed integer
    #[error("invalid slice value: '{0}'")]
    InvalidValue(String),

    /// A component was not an integer, a range, or `...`
    #[error("invalid slice component: '{0}'")]
    InvalidComponent(String),
}

/// Errors surfaced by the hierarchical-data store and the accessors built on it
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The target file does not exist on the filesystem
    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but the internal path does not resolve to an object
    #[error("path '{path}' not found in file '{}'", .file.display())]
    PathNotFound { path: String, file: PathBuf },

    /// A data read was requested on a non-dataset object
    #[error("path '{path}' is not a dataset (it's a {kind})")]
    NotADataset { path: String, kind: String },

    /// An unclassified failure from the underlying store
    #[error("failed to read file '{}': {message}", .file.display())]
    Io { file: PathBuf, message: String },

    /// An index expression could not be applied to the dataset
    #[error("failed to apply slice to dataset with shape {shape:?}: {message}")]
    SliceApplication { shape: Vec<usize>, message: String },
}

/// Errors from the startup directory scan
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// The scan root does not exist
    #[error("directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    /// The scan root is not a directory
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Request-level error composing every failure a protocol call can hit.
///
/// The MCP boundary converts each variant into a structured failure response;
/// raw store-internal errors never reach the caller.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Uri(#[from] UriError),

    #[error(transparent)]
    Slice(#[from] SliceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

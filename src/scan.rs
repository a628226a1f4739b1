//! Startup directory scan.
//!
//! Walks a root directory recursively and collects every file that both
//! carries an HDF5 extension and actually opens through the store. Files
//! that fail to open are skipped with a warning, never a hard failure: a
//! stray `.h5` file with garbage contents must not take the server down.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::store::DataStore;

/// Recognized HDF5 file extensions, matched case-insensitively.
const H5_EXTENSIONS: &[&str] = &["h5", "hdf5"];

/// Check whether a path carries a recognized HDF5 extension.
fn has_h5_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| H5_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Recursively scan `root` for valid HDF5 files.
///
/// Returns absolute paths in deterministic (name-sorted) order. Entries that
/// cannot be read or opened are logged and skipped.
pub fn scan_for_files<S: DataStore>(store: &S, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable directory entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_h5_extension(entry.path()) {
            continue;
        }

        let absolute = entry
            .path()
            .canonicalize()
            .unwrap_or_else(|_| entry.path().to_path_buf());

        match store.open_read(&absolute) {
            Ok(_) => found.push(absolute),
            Err(e) => {
                warn!("skipping invalid HDF5 file '{}': {e}", absolute.display());
            }
        }
    }
    Ok(found)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_h5_extension() {
        assert!(has_h5_extension(Path::new("/a/b.h5")));
        assert!(has_h5_extension(Path::new("/a/b.HDF5")));
        assert!(has_h5_extension(Path::new("/a/b.H5")));
        assert!(!has_h5_extension(Path::new("/a/b.txt")));
        assert!(!has_h5_extension(Path::new("/a/h5")));
        assert!(!has_h5_extension(Path::new("/a/b")));
    }
}

//! Directory scan tests: extension filtering, recursion, and skip-on-invalid.
//!
//! The store decides which files "open": only paths registered in the
//! in-memory store count as valid, so an unregistered `.h5` file plays the
//! role of a corrupt file on disk.

use std::fs;
use std::path::Path;

use h5_bridge::store::{MemoryFile, MemoryStore};
use h5_bridge::{scan_for_files, ScanError};

use super::test_utils::sample_file;

fn touch(path: &Path) {
    fs::write(path, b"\x89HDF\r\n\x1a\n").expect("write test file");
}

#[test]
fn scan_finds_valid_files_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();

    let a = dir.path().join("a.h5");
    let b = nested.join("b.hdf5");
    let ignored = dir.path().join("notes.txt");
    touch(&a);
    touch(&b);
    touch(&ignored);

    let store = MemoryStore::new()
        .with_file(a.canonicalize().unwrap(), sample_file())
        .with_file(b.canonicalize().unwrap(), sample_file());

    let found = scan_for_files(&store, dir.path()).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.contains(&a.canonicalize().unwrap()));
    assert!(found.contains(&b.canonicalize().unwrap()));
}

#[test]
fn scan_skips_files_that_fail_to_open() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.h5");
    let corrupt = dir.path().join("corrupt.h5");
    touch(&good);
    touch(&corrupt);

    // only `good` is registered, so `corrupt` fails to open and is skipped
    let store = MemoryStore::new().with_file(good.canonicalize().unwrap(), sample_file());

    let found = scan_for_files(&store, dir.path()).unwrap();
    assert_eq!(found, vec![good.canonicalize().unwrap()]);
}

#[test]
fn scan_matches_extensions_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    let upper = dir.path().join("DATA.H5");
    touch(&upper);

    let store = MemoryStore::new().with_file(upper.canonicalize().unwrap(), sample_file());

    let found = scan_for_files(&store, dir.path()).unwrap();
    assert_eq!(found, vec![upper.canonicalize().unwrap()]);
}

#[test]
fn scan_of_empty_directory_returns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let found = scan_for_files(&MemoryStore::new(), dir.path()).unwrap();
    assert!(found.is_empty());
}

#[test]
fn scan_of_missing_root_fails() {
    let err = scan_for_files(&MemoryStore::new(), Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, ScanError::MissingRoot(_)));
}

#[test]
fn scan_of_file_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.h5");
    touch(&file);

    let err = scan_for_files(&MemoryStore::new(), &file).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

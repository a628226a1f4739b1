//! Test utilities for integration tests.
//!
//! Builds in-memory store fixtures mirroring the shapes real HDF5 files
//! take: nested groups, attributes, multi-dimensional and scalar datasets,
//! soft and external links.

use h5_bridge::store::{AttrValue, MemoryFile, MemoryStore, RawArray};

/// Path the sample file is registered under.
pub const SAMPLE_FILE: &str = "/data/sample.h5";

/// A store with one richly populated file.
///
/// Layout:
///
/// ```text
/// /                       title="integration sample"
/// ├── data                int64[5] = [0, 1, 2, 3, 4]
/// ├── experiment/         description="test run"
/// │   └── temps           float64[2, 3], chunked [1, 3]
/// ├── names               str[2] = ["alpha", "beta"]
/// ├── answer              int64 scalar = 42
/// ├── alias      -> /data
/// └── remote     -> /other/archive.h5:/data
/// ```
pub fn sample_store() -> MemoryStore {
    MemoryStore::new().with_file(SAMPLE_FILE, sample_file())
}

pub fn sample_file() -> MemoryFile {
    MemoryFile::new()
        .root_attrs(vec![(
            "title".to_string(),
            AttrValue::Text("integration sample".to_string()),
        )])
        .dataset_with(
            "/data",
            RawArray::from_ints(vec![0, 1, 2, 3, 4]),
            vec![("units".to_string(), AttrValue::Text("counts".to_string()))],
            None,
        )
        .group_with_attrs(
            "/experiment",
            vec![(
                "description".to_string(),
                AttrValue::Text("test run".to_string()),
            )],
        )
        .dataset_with(
            "/experiment/temps",
            RawArray::floats_with_shape(&[2, 3], vec![20.5, 21.0, 19.75, 22.0, 20.0, 18.5])
                .expect("shape matches data"),
            Vec::new(),
            Some(vec![1, 3]),
        )
        .dataset(
            "/names",
            RawArray::from_texts(vec!["alpha".to_string(), "beta".to_string()]),
        )
        .dataset("/answer", RawArray::int_scalar(42))
        .soft_link("/alias", "/data")
        .external_link("/remote", "/other/archive.h5", "/data")
}

/// URI addressing an object inside the sample file.
pub fn sample_uri(internal_path: &str) -> String {
    h5_bridge::build_uri(SAMPLE_FILE, internal_path).expect("valid sample uri")
}

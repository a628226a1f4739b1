//! Protocol handler tests: resource listing, resource reads, and the
//! dataset-slicing tool, exercised the way the MCP layer calls them.

use std::path::PathBuf;

use h5_bridge::server::{list_resources, read_resource, slice_dataset, HDF5_MIME_TYPE};
use h5_bridge::{RequestError, SliceError, StoreError, UriError};

use super::test_utils::{sample_store, sample_uri, SAMPLE_FILE};

#[test]
fn resource_list_has_one_entry_per_file() {
    let files = vec![
        PathBuf::from("/data/sample.h5"),
        PathBuf::from("/data/nested/run.hdf5"),
    ];
    let entries = list_resources(&files);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].uri, "h5:///data/sample.h5?path=/");
    assert_eq!(entries[0].name, "sample.h5");
    assert_eq!(entries[0].description, "HDF5 file: sample.h5");
    assert_eq!(entries[1].name, "run.hdf5");
    assert!(entries.iter().all(|e| e.mime_type == HDF5_MIME_TYPE));
}

#[test]
fn resource_list_is_empty_for_no_files() {
    assert!(list_resources(&[]).is_empty());
}

#[test]
fn root_group_summary_lists_members_with_uris() {
    let text = read_resource(&sample_store(), &sample_uri("/")).unwrap();

    assert!(text.starts_with("HDF5 Group: /"));
    assert!(text.contains(&format!("File: {SAMPLE_FILE}")));
    assert!(text.contains("Members (6):"));
    assert!(text.contains(&format!("  - data ({})", sample_uri("/data"))));
    assert!(text.contains(&format!("  - experiment ({})", sample_uri("/experiment"))));
    assert!(text.contains("  title: integration sample"));
}

#[test]
fn dataset_summary_reports_shape_type_size_and_chunks() {
    let text = read_resource(&sample_store(), &sample_uri("/experiment/temps")).unwrap();

    assert!(text.starts_with("HDF5 Dataset: /experiment/temps"));
    assert!(text.contains("Shape: [2, 3]"));
    assert!(text.contains("Data type: float64"));
    assert!(text.contains("Size: 6 elements"));
    assert!(text.contains("Chunks: [1, 3]"));
    assert!(text.contains("To read data, use the read_dataset_slice tool with URI:"));
}

#[test]
fn link_summaries_show_targets_without_following() {
    let soft = read_resource(&sample_store(), &sample_uri("/alias")).unwrap();
    assert!(soft.starts_with("HDF5 SoftLink: /alias"));
    assert!(soft.contains("Target: /data"));

    let external = read_resource(&sample_store(), &sample_uri("/remote")).unwrap();
    assert!(external.starts_with("HDF5 ExternalLink: /remote"));
    assert!(external.contains("Target: /other/archive.h5:/data"));
}

#[test]
fn read_resource_rejects_malformed_uris() {
    let store = sample_store();

    assert!(matches!(
        read_resource(&store, "").unwrap_err(),
        RequestError::Uri(UriError::Empty)
    ));
    assert!(matches!(
        read_resource(&store, "gopher:///f.h5?path=/").unwrap_err(),
        RequestError::Uri(UriError::InvalidScheme(_))
    ));
    assert!(matches!(
        read_resource(&store, "h5:///f.h5").unwrap_err(),
        RequestError::Uri(UriError::MissingPathParam)
    ));
}

#[test]
fn read_resource_distinguishes_missing_file_from_missing_path() {
    let store = sample_store();

    let err = read_resource(&store, "h5:///absent.h5?path=/").unwrap_err();
    assert!(matches!(
        err,
        RequestError::Store(StoreError::FileNotFound(_))
    ));

    let err = read_resource(&store, &sample_uri("/absent")).unwrap_err();
    match err {
        RequestError::Store(StoreError::PathNotFound { path, file }) => {
            assert_eq!(path, "/absent");
            assert_eq!(file, PathBuf::from(SAMPLE_FILE));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn tool_returns_pretty_json_for_full_read() {
    let json = slice_dataset(&sample_store(), &sample_uri("/data"), ":").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, serde_json::json!([0, 1, 2, 3, 4]));
}

#[test]
fn tool_returns_partial_read() {
    let json = slice_dataset(&sample_store(), &sample_uri("/data"), "1:4").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, serde_json::json!([1, 2, 3]));
}

#[test]
fn tool_returns_nested_json_for_2d_read() {
    let json = slice_dataset(&sample_store(), &sample_uri("/experiment/temps"), ":").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!([[20.5, 21.0, 19.75], [22.0, 20.0, 18.5]])
    );
}

#[test]
fn tool_errors_name_the_offending_input() {
    let store = sample_store();

    let err = slice_dataset(&store, "not-a-uri", ":").unwrap_err();
    assert!(matches!(err, RequestError::Uri(_)));

    let err = slice_dataset(&store, &sample_uri("/data"), "0:abc").unwrap_err();
    match err {
        RequestError::Slice(SliceError::InvalidValue(value)) => assert_eq!(value, "abc"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = slice_dataset(&store, &sample_uri("/experiment"), ":").unwrap_err();
    assert!(err.to_string().contains("is not a dataset"));
}

#[test]
fn error_messages_are_human_readable() {
    let store = sample_store();

    let err = read_resource(&store, "h5:///absent.h5?path=/").unwrap_err();
    assert_eq!(err.to_string(), "file does not exist: /absent.h5");

    let err = slice_dataset(&store, &sample_uri("/data"), "0:1:2:3").unwrap_err();
    assert_eq!(err.to_string(), "too many ':' in slice component: '0:1:2:3'");
}

//! End-to-end addressing and slicing: URI string in, value tree out.

use h5_bridge::{
    describe, parse_slice, parse_uri, read_dataset_slice, ObjectInfo, SlicedValue, StoreError,
};

use super::test_utils::{sample_store, sample_uri};

fn read_via_uri(internal_path: &str, slice_str: &str) -> Result<SlicedValue, StoreError> {
    let address = parse_uri(&sample_uri(internal_path)).expect("valid uri");
    let terms = parse_slice(slice_str).expect("valid slice");
    read_dataset_slice(
        &sample_store(),
        &address.file_path,
        &address.internal_path,
        &terms,
    )
}

fn ints(values: &[i64]) -> SlicedValue {
    SlicedValue::Seq(values.iter().map(|v| SlicedValue::Int(*v)).collect())
}

#[test]
fn full_range_reads_all_five_elements() {
    assert_eq!(read_via_uri("/data", ":").unwrap(), ints(&[0, 1, 2, 3, 4]));
}

#[test]
fn bounded_range_reads_middle_elements() {
    assert_eq!(read_via_uri("/data", "1:4").unwrap(), ints(&[1, 2, 3]));
}

#[test]
fn empty_slice_reads_everything() {
    assert_eq!(read_via_uri("/data", "").unwrap(), ints(&[0, 1, 2, 3, 4]));
}

#[test]
fn integer_index_collapses_to_scalar() {
    assert_eq!(read_via_uri("/data", "3").unwrap(), SlicedValue::Int(3));
}

#[test]
fn stop_beyond_extent_returns_available_elements() {
    assert_eq!(read_via_uri("/data", "2:999").unwrap(), ints(&[2, 3, 4]));
}

#[test]
fn stepped_and_negative_indexing() {
    assert_eq!(read_via_uri("/data", "::2").unwrap(), ints(&[0, 2, 4]));
    assert_eq!(read_via_uri("/data", "-2").unwrap(), SlicedValue::Int(3));
}

#[test]
fn two_dimensional_reads_nest_by_row() {
    let value = read_via_uri("/experiment/temps", ":, 0").unwrap();
    assert_eq!(
        value,
        SlicedValue::Seq(vec![SlicedValue::Float(20.5), SlicedValue::Float(22.0)])
    );

    let row = read_via_uri("/experiment/temps", "1").unwrap();
    assert_eq!(
        row,
        SlicedValue::Seq(vec![
            SlicedValue::Float(22.0),
            SlicedValue::Float(20.0),
            SlicedValue::Float(18.5),
        ])
    );
}

#[test]
fn ellipsis_fills_leading_dimensions() {
    let value = read_via_uri("/experiment/temps", "..., 2").unwrap();
    assert_eq!(
        value,
        SlicedValue::Seq(vec![SlicedValue::Float(19.75), SlicedValue::Float(18.5)])
    );
}

#[test]
fn scalar_dataset_reads_as_bare_scalar() {
    assert_eq!(read_via_uri("/answer", "").unwrap(), SlicedValue::Int(42));
}

#[test]
fn string_dataset_decodes_to_text() {
    assert_eq!(
        read_via_uri("/names", "1").unwrap(),
        SlicedValue::Text("beta".to_string())
    );
}

#[test]
fn reading_a_group_names_the_actual_kind() {
    let err = read_via_uri("/experiment", ":").unwrap_err();
    match err {
        StoreError::NotADataset { path, kind } => {
            assert_eq!(path, "/experiment");
            assert_eq!(kind, "Group");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn describe_and_read_agree_on_element_count() {
    let address = parse_uri(&sample_uri("/data")).unwrap();
    let info = describe(&sample_store(), &address.file_path, &address.internal_path).unwrap();
    let ObjectInfo::Dataset { size, .. } = info else {
        panic!("expected dataset");
    };

    let value = read_via_uri("/data", "").unwrap();
    let SlicedValue::Seq(elements) = value else {
        panic!("expected sequence");
    };
    assert_eq!(elements.len(), size);
}

#[test]
fn slice_application_error_carries_dataset_shape() {
    let err = read_via_uri("/experiment/temps", "0, 0, 0").unwrap_err();
    match err {
        StoreError::SliceApplication { shape, .. } => assert_eq!(shape, vec![2, 3]),
        other => panic!("unexpected error: {other:?}"),
    }
}

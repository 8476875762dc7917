//! Footer verification, malformed input and path-based I/O.

mod common;

use std::path::Path;

use gbkf_core::{footer, FooterStatus, GbkfError, Reader, Writer};

#[test]
fn test_flipping_any_byte_breaks_the_checksum() {
    let mut writer = common::sample_writer();
    let bytes = writer.finalize(true, true).expect("finalize");
    let reader = Reader::from_bytes(bytes.clone()).expect("open");
    assert!(reader.verifies_checksum());
    // Untouched buffers keep verifying.
    assert!(Reader::from_bytes(bytes.clone()).expect("open").verifies_checksum());

    let body_len = bytes.len() - 32;
    for index in 0..body_len {
        let mut corrupted = bytes.clone();
        corrupted[index] ^= 0x5a;
        assert!(!footer::verify(&corrupted), "flip at byte {index} went unnoticed");
    }
}

#[test]
fn test_corrupt_but_well_formed_buffer_still_decodes() {
    let mut writer = Writer::new();
    writer.add_keyed_values_int16("k", 0, &[10, 20]).expect("int16");
    let mut bytes = writer.finalize(true, true).expect("finalize");
    // Change a value byte: structure is intact, digest is not.
    bytes[30] = 11;

    let reader = Reader::from_bytes(bytes).expect("open");
    assert_eq!(reader.footer_status(), FooterStatus::Mismatch);
    assert!(!reader.verifies_checksum());
    let entries = reader.keyed_entries().expect("decode");
    assert_eq!(entries.get("k").expect("k")[0].values::<i16>().expect("i16"), &[11, 20]);
}

#[test]
fn test_missing_footer_is_absent_not_an_error() {
    let mut writer = Writer::new();
    writer.add_keyed_values_uint8("k", 0, &[1]).expect("uint8");
    let reader = Reader::from_bytes(writer.finalize(true, false).expect("finalize"))
        .expect("open");
    assert_eq!(reader.footer_status(), FooterStatus::Absent);
    assert!(!reader.verifies_checksum());
    assert_eq!(reader.keyed_entries().expect("decode").len(), 1);
}

#[test]
fn test_long_footerless_buffer_reports_mismatch() {
    let mut writer = Writer::new();
    writer.add_keyed_values_uint64("k", 0, &[1, 2, 3, 4]).expect("uint64");
    let bytes = writer.finalize(true, false).expect("finalize");
    assert!(bytes.len() >= 52);

    let reader = Reader::from_bytes(bytes).expect("open");
    assert_eq!(reader.footer_status(), FooterStatus::Mismatch);
    assert_eq!(reader.keyed_entries().expect("decode").entry_count(), 1);
}

#[test]
fn test_magic_only_buffer_is_truncated() {
    let err = Reader::from_bytes(b"gbkf".to_vec()).unwrap_err();
    match err {
        GbkfError::TruncatedData { offset, .. } => assert_eq!(offset, 0),
        _ => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_wrong_magic_is_rejected() {
    let mut bytes = Writer::new().finalize(true, true).expect("finalize");
    bytes[..4].copy_from_slice(b"GBKF");
    let err = Reader::from_bytes(bytes).unwrap_err();
    match err {
        GbkfError::InvalidMagic { found } => assert_eq!(found, b"GBKF"),
        _ => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_overstated_entry_count_is_truncated() {
    let mut writer = Writer::new();
    writer.add_keyed_values_uint32("k", 0, &[1]).expect("uint32");
    writer.set_entry_count(2);
    let bytes = writer.finalize(false, false).expect("finalize");

    let reader = Reader::from_bytes(bytes).expect("header decodes");
    assert!(matches!(
        reader.keyed_entries(),
        Err(GbkfError::TruncatedData { .. })
    ));
}

#[test]
fn test_write_and_read_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sample.gbkf");

    let mut writer = common::sample_writer();
    writer.write(&path, true, true).expect("write");

    let reader = Reader::from_path(&path).expect("read");
    assert!(reader.verifies_checksum());
    assert_eq!(reader.entry_count(), common::SAMPLE_ENTRY_COUNT);
    assert_eq!(
        reader.as_bytes(),
        writer.finalize(true, true).expect("finalize").as_slice()
    );
}

#[test]
fn test_repeated_writes_stay_valid() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("grow.gbkf");

    let mut writer = Writer::new();
    writer.add_keyed_values_int64("a", 0, &[1]).expect("int64");
    writer.write(&path, true, true).expect("first write");
    writer.add_keyed_values_int64("a", 1, &[2]).expect("int64");
    writer.write(&path, true, true).expect("second write");

    let reader = Reader::from_path(&path).expect("read");
    assert!(reader.verifies_checksum());
    assert_eq!(reader.entry_count(), 2);
    assert_eq!(reader.keyed_entries().expect("decode").entry_count(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Reader::from_path(dir.path().join("nope.gbkf")).unwrap_err();
    assert!(matches!(err, GbkfError::Io { .. }), "unexpected error: {err}");
}

#[test]
fn test_custom_byte_store() {
    let store = common::InMemoryStore::new();
    let path = Path::new("mem/sample.gbkf");

    let mut writer = common::sample_writer();
    writer.write_to(&store, path, true, false).expect("write");
    assert!(store.get(path).is_some());

    let reader = Reader::from_source(&store, path).expect("read");
    // Long enough to carry a footer, so the missing one reads as a mismatch.
    assert_eq!(reader.footer_status(), FooterStatus::Mismatch);
    assert_eq!(reader.keyed_entries().expect("decode").entry_count(), 14);

    writer.write_to(&store, path, true, true).expect("rewrite");
    let reader = Reader::from_source(&store, path).expect("read");
    assert_eq!(reader.footer_status(), FooterStatus::Verified);

    assert!(matches!(
        Reader::from_source(&store, Path::new("mem/other.gbkf")),
        Err(GbkfError::Io { .. })
    ));
}

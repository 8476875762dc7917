//! Foreign-language bindings for the GBKF container codec.
//!
//! Exposes [`GbkfReader`] and [`GbkfWriter`] through `UniFFI`, together with
//! the records they exchange and a bridge that forwards the codec's `log`
//! records to a host-language [`Logger`].

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
pub use error::*;

pub mod logger;
pub use logger::*;

mod reader;
pub use reader::*;

mod types;
pub use types::*;

mod writer;
pub use writer::*;

uniffi::setup_scaffolding!("gbkf");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_reader_roundtrip() {
        let writer = GbkfWriter::new();
        writer.set_key_width(2).expect("key width");
        writer
            .add_keyed_values_uint16("ID".to_owned(), 7, vec![1, 200, 300])
            .expect("uint16");
        writer
            .add_keyed_values_string_ascii(
                "NM".to_owned(),
                1,
                vec!["ada".to_owned()],
                0,
                GbkfEncodingChoice::Secondary,
            )
            .expect("ascii");
        writer
            .add_keyed_values_boolean("ID".to_owned(), 8, vec![true])
            .expect("boolean");
        assert_eq!(writer.keys(), vec!["ID".to_owned(), "NM".to_owned()]);

        let reader = GbkfReader::from_bytes(writer.finalize(true, true).expect("finalize"))
            .expect("open");
        assert!(reader.verifies_checksum());
        assert_eq!(reader.footer_status(), GbkfFooterStatus::Verified);
        assert_eq!(reader.entry_count(), 3);

        let entries = reader.keyed_entries().expect("decode");
        assert_eq!(
            entries,
            vec![
                GbkfKeyedEntry {
                    key: "ID".to_owned(),
                    instance_id: 7,
                    values: GbkfValues::UInt16 {
                        values: vec![1, 200, 300]
                    },
                },
                GbkfKeyedEntry {
                    key: "ID".to_owned(),
                    instance_id: 8,
                    values: GbkfValues::Boolean { values: vec![true] },
                },
                GbkfKeyedEntry {
                    key: "NM".to_owned(),
                    instance_id: 1,
                    values: GbkfValues::Text {
                        values: vec!["ada".to_owned()]
                    },
                },
            ]
        );
        assert_eq!(
            string_encoding_from_id(reader.secondary_string_encoding()).expect("encoding"),
            GbkfStringEncoding::Ascii
        );
    }

    #[test]
    fn test_errors_cross_the_boundary() {
        let writer = GbkfWriter::new();
        let err = writer
            .add_keyed_values_int8("too-long".to_owned(), 0, vec![1])
            .unwrap_err();
        assert!(err.to_string().starts_with("key width mismatch"));
        assert!(std::error::Error::source(&err).is_some());

        assert!(GbkfReader::from_bytes(b"gbkf".to_vec()).is_err());
        assert!(string_encoding_from_id(42).is_err());
    }

    #[test]
    fn test_write_to_path_and_reset() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.gbkf").to_string_lossy().into_owned();

        let writer = GbkfWriter::new();
        writer.set_specification_id(9);
        writer
            .add_keyed_values_float64("f".to_owned(), 0, vec![0.5])
            .expect("float64");
        writer.write(path.clone(), true, false).expect("write");

        let reader = GbkfReader::from_path(path).expect("read");
        assert_eq!(reader.specification_id(), 9);
        assert_eq!(reader.footer_status(), GbkfFooterStatus::Absent);

        writer.reset();
        assert_eq!(writer.entry_count(), 0);
        assert!(writer.keys().is_empty());
    }
}

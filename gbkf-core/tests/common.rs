//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gbkf_core::{
    ByteSink, ByteSource, EncodingChoice, GbkfError, GbkfResult, StringEncoding, Writer,
};

/// Byte store kept in memory, keyed by path.
#[derive(Default)]
pub struct InMemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the bytes stored at `path`, if any.
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().expect("lock").get(path).cloned()
    }
}

impl ByteSource for InMemoryStore {
    fn read_all(&self, path: &Path) -> GbkfResult<Vec<u8>> {
        self.get(path).ok_or_else(|| {
            GbkfError::io(
                format!("reading {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such entry"),
            )
        })
    }
}

impl ByteSink for InMemoryStore {
    fn write_all(&self, path: &Path, bytes: &[u8]) -> GbkfResult<()> {
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Writer with a two-byte key width and one entry of every kind.
pub fn sample_writer() -> Writer {
    let mut writer = Writer::new();
    writer.set_format_version(2);
    writer.set_specification_id(0xfeed);
    writer.set_specification_version(7);
    writer.set_secondary_string_encoding(StringEncoding::Latin1);
    writer.set_key_width(2).expect("key width");

    writer
        .add_keyed_values_blob("BL", 1, &hex::decode("deadbeef00").expect("hex"))
        .expect("blob");
    writer
        .add_keyed_values_boolean("BO", 2, &[true, false, true, true, false, true, false, false, true])
        .expect("boolean");
    writer
        .add_keyed_values_string_utf8("ST", 3, &["h\u{e9}llo", "w\u{f6}rld \u{1f30d}"], 0, EncodingChoice::Main)
        .expect("utf8 strings");
    writer
        .add_keyed_values_string_latin1("ST", 4, &["caf\u{e9}", "na\u{ef}ve"], 6, EncodingChoice::Secondary)
        .expect("latin1 strings");
    writer.add_keyed_values_int8("I1", 5, &[i8::MIN, -1, 0, i8::MAX]).expect("int8");
    writer.add_keyed_values_int16("I2", 6, &[i16::MIN, 0, i16::MAX]).expect("int16");
    writer.add_keyed_values_int32("I4", 7, &[i32::MIN, 0, i32::MAX]).expect("int32");
    writer.add_keyed_values_int64("I8", 8, &[i64::MIN, 0, i64::MAX]).expect("int64");
    writer.add_keyed_values_uint8("U1", 9, &[0, 128, u8::MAX]).expect("uint8");
    writer.add_keyed_values_uint16("U2", 10, &[0, u16::MAX]).expect("uint16");
    writer.add_keyed_values_uint32("U4", 11, &[0, u32::MAX]).expect("uint32");
    writer.add_keyed_values_uint64("U8", 12, &[0, u64::MAX]).expect("uint64");
    writer
        .add_keyed_values_float32("F4", 13, &[-0.0, 1.5, f32::MIN_POSITIVE, f32::NAN])
        .expect("float32");
    writer
        .add_keyed_values_float64("F8", 14, &[-0.0, 2.5e300, f64::from_bits(0x7ff8_0000_0000_0001)])
        .expect("float64");
    writer
}

/// Number of entries [`sample_writer`] appends.
pub const SAMPLE_ENTRY_COUNT: u32 = 14;

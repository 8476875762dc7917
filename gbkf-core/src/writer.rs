//! Streaming container encoder.
//!
//! A [`Writer`] owns a growing buffer that always starts with a complete
//! header. Each `add_keyed_values_*` call validates its input, serializes one
//! entry and appends it; nothing is appended when validation fails. Header
//! setters patch the buffered header in place.

use std::path::Path;

use log::{debug, trace, warn};

use crate::cursor::ByteWriter;
use crate::encoder;
use crate::entry::{KeyedEntry, Values};
use crate::entry_map::KeySet;
use crate::error::{GbkfError, GbkfResult};
use crate::footer::{self, DigestProvider, Sha256Digest};
use crate::format::{
    ENTRY_COUNT_OFFSET, FORMAT_VERSION_OFFSET, KEY_WIDTH_OFFSET, MAIN_STRING_ENCODING_OFFSET,
    SECONDARY_STRING_ENCODING_OFFSET, SPECIFICATION_ID_OFFSET, SPECIFICATION_VERSION_OFFSET,
};
use crate::header::Header;
use crate::io::{ByteSink, FsStore};
use crate::value_type::{EncodingChoice, StringEncoding, ValueType};

/// Builds a GBKF buffer entry by entry.
///
/// Not internally synchronized; share it behind a lock.
#[derive(Debug, Clone)]
pub struct Writer {
    buffer: Vec<u8>,
    header: Header,
    entries_written: u32,
    count_is_manual: bool,
    keys: KeySet,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! fixed_writers {
    ($($(#[$doc:meta])* $name:ident => $ty:ty, $variant:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`]
            /// for a bad key and [`GbkfError::ValueOutOfRange`] for more than
            /// `u32::MAX` values.
            pub fn $name(&mut self, key: &str, instance_id: u32, values: &[$ty]) -> GbkfResult<()> {
                let payload = encoder::fixed(values, <$ty>::to_le_bytes);
                self.push_entry(key, instance_id, values.len(), ValueType::$variant, &payload)
            }
        )*
    };
}

impl Writer {
    /// Creates a writer holding only a default header.
    #[must_use]
    pub fn new() -> Self {
        let header = Header::default();
        Self {
            buffer: header.encode().to_vec(),
            header,
            entries_written: 0,
            count_is_manual: false,
            keys: KeySet::default(),
        }
    }

    /// Drops every buffered entry and restores the default header.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Header as currently buffered.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Buffered bytes: header and entries, without footer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Distinct keys in order of first use.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.keys.as_slice()
    }

    /// Number of entries appended so far.
    #[must_use]
    pub const fn entry_count(&self) -> u32 {
        self.entries_written
    }

    // ---------------------------------------------------------------------
    // Header setters
    // ---------------------------------------------------------------------

    /// Sets the format version.
    pub fn set_format_version(&mut self, version: u8) {
        self.header.format_version = version;
        self.patch_header(FORMAT_VERSION_OFFSET, &[version]);
    }

    /// Sets the application-level schema id.
    pub fn set_specification_id(&mut self, id: u32) {
        self.header.specification_id = id;
        self.patch_header(SPECIFICATION_ID_OFFSET, &id.to_le_bytes());
    }

    /// Sets the schema revision.
    pub fn set_specification_version(&mut self, version: u16) {
        self.header.specification_version = version;
        self.patch_header(SPECIFICATION_VERSION_OFFSET, &version.to_le_bytes());
    }

    /// Sets the encoding of the MAIN string slot.
    pub fn set_main_string_encoding(&mut self, encoding: StringEncoding) {
        self.header.main_string_encoding = encoding.id();
        self.patch_header(MAIN_STRING_ENCODING_OFFSET, &encoding.id().to_le_bytes());
    }

    /// Sets the encoding of the SECONDARY string slot.
    pub fn set_secondary_string_encoding(&mut self, encoding: StringEncoding) {
        self.header.secondary_string_encoding = encoding.id();
        self.patch_header(
            SECONDARY_STRING_ENCODING_OFFSET,
            &encoding.id().to_le_bytes(),
        );
    }

    /// Sets the byte length of every key.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] for 0 and
    /// [`GbkfError::KeyWidthMismatch`] if an already buffered key has another
    /// length.
    pub fn set_key_width(&mut self, width: u8) -> GbkfResult<()> {
        if width == 0 {
            return Err(GbkfError::out_of_range("key width must be at least 1"));
        }
        if let Some(key) = self
            .keys
            .as_slice()
            .iter()
            .find(|key| key.len() != usize::from(width))
        {
            return Err(GbkfError::KeyWidthMismatch {
                declared: width,
                key: key.clone(),
                found: key.len(),
            });
        }
        self.header.key_width = width;
        self.patch_header(KEY_WIDTH_OFFSET, &[width]);
        Ok(())
    }

    /// Sets the header entry count by hand.
    ///
    /// `finalize(true, _)` replaces it with the number of appended entries.
    pub fn set_entry_count(&mut self, count: u32) {
        self.count_is_manual = true;
        self.write_entry_count(count);
    }

    /// Sets the header entry count to the number of appended entries.
    pub fn set_entry_count_auto(&mut self) {
        self.count_is_manual = false;
        self.write_entry_count(self.entries_written);
    }

    fn write_entry_count(&mut self, count: u32) {
        self.header.entry_count = count;
        self.patch_header(ENTRY_COUNT_OFFSET, &count.to_le_bytes());
    }

    fn patch_header(&mut self, offset: usize, bytes: &[u8]) {
        let patched = ByteWriter::new(&mut self.buffer).patch(offset, bytes);
        debug_assert!(patched.is_ok(), "writer buffer always starts with a header");
    }

    // ---------------------------------------------------------------------
    // Entry writers
    // ---------------------------------------------------------------------

    /// Appends a blob; its value count is the byte length.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`]
    /// for a bad key and [`GbkfError::ValueOutOfRange`] for more than
    /// `u32::MAX` bytes.
    pub fn add_keyed_values_blob(
        &mut self,
        key: &str,
        instance_id: u32,
        bytes: &[u8],
    ) -> GbkfResult<()> {
        self.push_entry(key, instance_id, bytes.len(), ValueType::Blob, bytes)
    }

    /// Appends bit-packed booleans.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`]
    /// for a bad key and [`GbkfError::ValueOutOfRange`] for more than
    /// `u32::MAX` values.
    pub fn add_keyed_values_boolean(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[bool],
    ) -> GbkfResult<()> {
        let payload = encoder::booleans(values);
        self.push_entry(key, instance_id, values.len(), ValueType::Boolean, &payload)
    }

    /// Appends ASCII strings.
    ///
    /// `max_size` 0 selects the dynamic layout; otherwise every value takes a
    /// NUL-padded slot of `max_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`GbkfError::EncodingMismatch`] if the `choice` slot is not ASCII
    /// - [`GbkfError::InvalidString`] for non-ASCII characters
    /// - [`GbkfError::ValueOutOfRange`] for values that do not fit
    /// - [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`] for a bad key
    pub fn add_keyed_values_string_ascii<S: AsRef<str>>(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[S],
        max_size: u16,
        choice: EncodingChoice,
    ) -> GbkfResult<()> {
        self.add_strings(
            key,
            instance_id,
            values,
            max_size,
            choice,
            StringEncoding::Ascii,
        )
    }

    /// Appends ISO 8859-1 strings.
    ///
    /// `max_size` 0 selects the dynamic layout; otherwise every value takes a
    /// NUL-padded slot of `max_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`GbkfError::EncodingMismatch`] if the `choice` slot is not Latin-1
    /// - [`GbkfError::InvalidString`] for characters above U+00FF
    /// - [`GbkfError::ValueOutOfRange`] for values that do not fit
    /// - [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`] for a bad key
    pub fn add_keyed_values_string_latin1<S: AsRef<str>>(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[S],
        max_size: u16,
        choice: EncodingChoice,
    ) -> GbkfResult<()> {
        self.add_strings(
            key,
            instance_id,
            values,
            max_size,
            choice,
            StringEncoding::Latin1,
        )
    }

    /// Appends UTF-8 strings.
    ///
    /// `max_size` 0 selects the dynamic layout; otherwise every value takes a
    /// NUL-padded slot of `max_size * 4` bytes.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`GbkfError::EncodingMismatch`] if the `choice` slot is not UTF-8
    /// - [`GbkfError::ValueOutOfRange`] for values that do not fit
    /// - [`GbkfError::KeyWidthMismatch`] or [`GbkfError::InvalidKey`] for a bad key
    pub fn add_keyed_values_string_utf8<S: AsRef<str>>(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[S],
        max_size: u16,
        choice: EncodingChoice,
    ) -> GbkfResult<()> {
        self.add_strings(
            key,
            instance_id,
            values,
            max_size,
            choice,
            StringEncoding::Utf8,
        )
    }

    fn add_strings<S: AsRef<str>>(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[S],
        max_size: u16,
        choice: EncodingChoice,
        requested: StringEncoding,
    ) -> GbkfResult<()> {
        let declared = self.header.encoding(choice)?;
        if declared == StringEncoding::Undefined {
            return Err(GbkfError::UnsupportedEncoding(declared.id()));
        }
        if declared != requested {
            return Err(GbkfError::EncodingMismatch {
                choice,
                declared,
                requested,
            });
        }
        let payload = encoder::strings(values, requested, choice, max_size)?;
        self.push_entry(key, instance_id, values.len(), ValueType::String, &payload)
    }

    fixed_writers! {
        /// Appends `i8` values.
        add_keyed_values_int8 => i8, Int8;
        /// Appends `i16` values.
        add_keyed_values_int16 => i16, Int16;
        /// Appends `i32` values.
        add_keyed_values_int32 => i32, Int32;
        /// Appends `i64` values.
        add_keyed_values_int64 => i64, Int64;
        /// Appends `u8` values.
        add_keyed_values_uint8 => u8, UInt8;
        /// Appends `u16` values.
        add_keyed_values_uint16 => u16, UInt16;
        /// Appends `u32` values.
        add_keyed_values_uint32 => u32, UInt32;
        /// Appends `u64` values.
        add_keyed_values_uint64 => u64, UInt64;
    }

    /// Appends `f32` values bit-exact.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] for infinite values or more than
    /// `u32::MAX` values, and [`GbkfError::KeyWidthMismatch`] or
    /// [`GbkfError::InvalidKey`] for a bad key.
    pub fn add_keyed_values_float32(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[f32],
    ) -> GbkfResult<()> {
        encoder::check_finite_f32(values)?;
        let payload = encoder::fixed(values, f32::to_le_bytes);
        self.push_entry(key, instance_id, values.len(), ValueType::Float32, &payload)
    }

    /// Appends `f64` values narrowed to `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] for values beyond `f32::MAX` in
    /// magnitude, and [`GbkfError::KeyWidthMismatch`] or
    /// [`GbkfError::InvalidKey`] for a bad key.
    pub fn add_keyed_values_float32_narrowing(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[f64],
    ) -> GbkfResult<()> {
        let narrowed = encoder::narrow_to_f32(values)?;
        self.add_keyed_values_float32(key, instance_id, &narrowed)
    }

    /// Appends `f64` values bit-exact.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] for infinite values or more than
    /// `u32::MAX` values, and [`GbkfError::KeyWidthMismatch`] or
    /// [`GbkfError::InvalidKey`] for a bad key.
    pub fn add_keyed_values_float64(
        &mut self,
        key: &str,
        instance_id: u32,
        values: &[f64],
    ) -> GbkfResult<()> {
        encoder::check_finite_f64(values)?;
        let payload = encoder::fixed(values, f64::to_le_bytes);
        self.push_entry(key, instance_id, values.len(), ValueType::Float64, &payload)
    }

    /// Re-encodes a keyed entry, typically one obtained from a [`crate::Reader`].
    ///
    /// String entries keep their decoded encoding choice and `max_size`;
    /// string entries built in memory use the MAIN slot in dynamic layout.
    /// Either way the slot's encoding in this writer's header applies.
    ///
    /// # Errors
    ///
    /// Returns the error of the matching `add_keyed_values_*` call.
    pub fn add_keyed_entry(&mut self, key: &str, entry: &KeyedEntry) -> GbkfResult<()> {
        let id = entry.instance_id;
        match entry.raw_values() {
            Values::Blob(v) => self.add_keyed_values_blob(key, id, v),
            Values::Boolean(v) => self.add_keyed_values_boolean(key, id, v),
            Values::String(v) => {
                let (choice, max_size) = entry
                    .string_layout()
                    .map_or((EncodingChoice::Main, 0), |layout| {
                        (layout.choice, layout.max_size)
                    });
                let encoding = self.header.encoding(choice)?;
                self.add_strings(key, id, v, max_size, choice, encoding)
            }
            Values::Int8(v) => self.add_keyed_values_int8(key, id, v),
            Values::Int16(v) => self.add_keyed_values_int16(key, id, v),
            Values::Int32(v) => self.add_keyed_values_int32(key, id, v),
            Values::Int64(v) => self.add_keyed_values_int64(key, id, v),
            Values::UInt8(v) => self.add_keyed_values_uint8(key, id, v),
            Values::UInt16(v) => self.add_keyed_values_uint16(key, id, v),
            Values::UInt32(v) => self.add_keyed_values_uint32(key, id, v),
            Values::UInt64(v) => self.add_keyed_values_uint64(key, id, v),
            Values::Float32(v) => self.add_keyed_values_float32(key, id, v),
            Values::Float64(v) => self.add_keyed_values_float64(key, id, v),
        }
    }

    fn check_key(&self, key: &str) -> GbkfResult<()> {
        if key.contains('\0') {
            return Err(GbkfError::InvalidKey {
                key: key.to_owned(),
                reason: "keys cannot contain NUL".to_owned(),
            });
        }
        if key.len() != usize::from(self.header.key_width) {
            return Err(GbkfError::KeyWidthMismatch {
                declared: self.header.key_width,
                key: key.to_owned(),
                found: key.len(),
            });
        }
        Ok(())
    }

    fn push_entry(
        &mut self,
        key: &str,
        instance_id: u32,
        count: usize,
        value_type: ValueType,
        payload: &[u8],
    ) -> GbkfResult<()> {
        self.check_key(key)?;
        let value_count = u32::try_from(count).map_err(|_| {
            GbkfError::out_of_range(format!("{count} {value_type} values exceed u32::MAX"))
        })?;
        let entries_written = self
            .entries_written
            .checked_add(1)
            .ok_or_else(|| GbkfError::out_of_range("entry count exceeds u32::MAX"))?;

        let offset = self.buffer.len();
        let mut out = ByteWriter::new(&mut self.buffer);
        out.put_bytes(key.as_bytes());
        out.put_u32(instance_id);
        out.put_u32(value_count);
        out.put_u8(value_type.tag());
        out.put_bytes(payload);

        self.entries_written = entries_written;
        self.keys.insert(key);
        trace!(
            "appended {value_type} entry at offset {offset}: key={key:?} instance={instance_id} count={value_count}"
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// Returns the finished buffer.
    ///
    /// With `auto_update_count` the header entry count is first set to the
    /// number of appended entries. With `add_footer` a SHA-256 digest of the
    /// output is appended to the returned copy; the writer itself keeps no
    /// footer, so it can keep appending and finalize again.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] if the output would exceed the
    /// addressable size.
    pub fn finalize(&mut self, auto_update_count: bool, add_footer: bool) -> GbkfResult<Vec<u8>> {
        self.finalize_with_digest(&Sha256Digest, auto_update_count, add_footer)
    }

    /// Same as [`Writer::finalize`] with a caller-chosen footer digest.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::ValueOutOfRange`] if the output would exceed the
    /// addressable size.
    pub fn finalize_with_digest(
        &mut self,
        digest: &dyn DigestProvider,
        auto_update_count: bool,
        add_footer: bool,
    ) -> GbkfResult<Vec<u8>> {
        if auto_update_count {
            if self.count_is_manual && self.header.entry_count != self.entries_written {
                warn!(
                    "entry count {} set by hand is replaced by {} appended entries",
                    self.header.entry_count, self.entries_written
                );
            }
            self.set_entry_count_auto();
        }

        let footer_len = if add_footer { crate::format::FOOTER_SIZE } else { 0 };
        let capacity = self
            .buffer
            .len()
            .checked_add(footer_len)
            .ok_or_else(|| GbkfError::out_of_range("output size overflows usize"))?;
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&self.buffer);
        if add_footer {
            let footer = footer::compute_with(digest, &out);
            out.extend_from_slice(&footer);
        }

        debug!(
            "finalized gbkf buffer: {} entries ({} in header), {} keys, {} bytes, footer={add_footer}",
            self.entries_written,
            self.header.entry_count,
            self.keys.len(),
            out.len()
        );
        Ok(out)
    }

    /// Finalizes and writes the buffer to `path` on the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::Io`] if the file cannot be written.
    pub fn write(
        &mut self,
        path: impl AsRef<Path>,
        auto_update_count: bool,
        add_footer: bool,
    ) -> GbkfResult<()> {
        self.write_to(&FsStore, path, auto_update_count, add_footer)
    }

    /// Finalizes and hands the buffer to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the error reported by `sink`.
    pub fn write_to(
        &mut self,
        sink: &dyn ByteSink,
        path: impl AsRef<Path>,
        auto_update_count: bool,
        add_footer: bool,
    ) -> GbkfResult<()> {
        let bytes = self.finalize(auto_update_count, add_footer)?;
        sink.write_all(path.as_ref(), &bytes)
    }
}

//! Fixed-size preamble of every GBKF buffer.

// Field names like entry_count appear in docs without backticks for readability
#![allow(clippy::doc_markdown)]

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{GbkfError, GbkfResult};
use crate::format::{HEADER_SIZE, MAGIC};
use crate::value_type::{EncodingChoice, StringEncoding};

/// Decoded header fields.
///
/// # Binary Layout (20 bytes)
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     magic ("gbkf")
/// 4       1     format_version
/// 5       4     specification_id (u32 LE)
/// 9       2     specification_version (u16 LE)
/// 11      2     main_string_encoding (u16 LE)
/// 13      2     secondary_string_encoding (u16 LE)
/// 15      1     key_width
/// 16      4     entry_count (u32 LE)
/// ```
///
/// The encoding ids are kept raw; they are only resolved when a string entry
/// selects them, so a header carrying an unknown id still decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Codec/container version.
    pub format_version: u8,
    /// Application-level schema id.
    pub specification_id: u32,
    /// Schema revision.
    pub specification_version: u16,
    /// Encoding id of the MAIN string slot.
    pub main_string_encoding: u16,
    /// Encoding id of the SECONDARY string slot.
    pub secondary_string_encoding: u16,
    /// Byte length of every entry key.
    pub key_width: u8,
    /// Number of keyed entries following the header.
    pub entry_count: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            format_version: 0,
            specification_id: 0,
            specification_version: 0,
            main_string_encoding: StringEncoding::Utf8.id(),
            secondary_string_encoding: StringEncoding::Ascii.id(),
            key_width: 1,
            entry_count: 0,
        }
    }
}

impl Header {
    /// Encodes the header to bytes.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        let mut writer = ByteWriter::new(&mut buf);
        writer.put_bytes(MAGIC);
        writer.put_u8(self.format_version);
        writer.put_u32(self.specification_id);
        writer.put_u16(self.specification_version);
        writer.put_u16(self.main_string_encoding);
        writer.put_u16(self.secondary_string_encoding);
        writer.put_u8(self.key_width);
        writer.put_u32(self.entry_count);

        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&buf);
        out
    }

    /// Decodes a header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer is shorter than the header
    /// - Magic bytes don't match
    pub fn decode(bytes: &[u8]) -> GbkfResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(GbkfError::truncated("header", 0, HEADER_SIZE, bytes.len()));
        }

        let mut reader = ByteReader::new(bytes);
        let magic = reader.take(MAGIC.len(), "magic")?;
        if magic != MAGIC {
            return Err(GbkfError::InvalidMagic {
                found: magic.to_vec(),
            });
        }

        Ok(Self {
            format_version: reader.read_u8()?,
            specification_id: reader.read_u32()?,
            specification_version: reader.read_u16()?,
            main_string_encoding: reader.read_u16()?,
            secondary_string_encoding: reader.read_u16()?,
            key_width: reader.read_u8()?,
            entry_count: reader.read_u32()?,
        })
    }

    /// Raw encoding id declared for `choice`.
    #[must_use]
    pub const fn encoding_id(&self, choice: EncodingChoice) -> u16 {
        match choice {
            EncodingChoice::Main => self.main_string_encoding,
            EncodingChoice::Secondary => self.secondary_string_encoding,
        }
    }

    /// Encoding declared for `choice`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::UnsupportedEncoding`] if the slot holds an unknown id.
    pub fn encoding(&self, choice: EncodingChoice) -> GbkfResult<StringEncoding> {
        StringEncoding::from_id(self.encoding_id(choice))
    }
}

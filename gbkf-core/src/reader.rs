//! Read-only view over a complete GBKF buffer.

use std::path::Path;

use log::debug;

use crate::decoder;
use crate::entry_map::KeyedEntries;
use crate::error::GbkfResult;
use crate::footer::{self, DigestProvider, FooterStatus, Sha256Digest};
use crate::header::Header;
use crate::io::{ByteSource, FsStore};

/// Decoded header plus the raw bytes its entries are read from.
///
/// The header and footer status are computed once at construction; entries
/// are decoded each time [`Reader::keyed_entries`] is called.
#[derive(Debug, Clone)]
pub struct Reader {
    data: Vec<u8>,
    header: Header,
    footer: FooterStatus,
}

impl Reader {
    /// Opens an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GbkfError::TruncatedData`] if the buffer is shorter
    /// than a header and [`crate::GbkfError::InvalidMagic`] if it does not
    /// start with `gbkf`.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> GbkfResult<Self> {
        Self::from_bytes_with_digest(data, &Sha256Digest)
    }

    /// Opens an in-memory buffer, checking the footer with `digest`.
    ///
    /// # Errors
    ///
    /// Same as [`Reader::from_bytes`].
    pub fn from_bytes_with_digest(
        data: impl Into<Vec<u8>>,
        digest: &dyn DigestProvider,
    ) -> GbkfResult<Self> {
        let data = data.into();
        let header = Header::decode(&data)?;
        let footer = footer::status_with(digest, &data);
        if footer == FooterStatus::Mismatch {
            debug!("gbkf footer missing or not matching the buffer contents");
        }
        debug!(
            "opened gbkf buffer: {} bytes, version={} spec={}/{} key_width={} entries={} footer={footer}",
            data.len(),
            header.format_version,
            header.specification_id,
            header.specification_version,
            header.key_width,
            header.entry_count,
        );
        Ok(Self {
            data,
            header,
            footer,
        })
    }

    /// Reads and opens the file at `path` on the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GbkfError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`Reader::from_bytes`].
    pub fn from_path(path: impl AsRef<Path>) -> GbkfResult<Self> {
        Self::from_source(&FsStore, path)
    }

    /// Reads the buffer at `path` from `source` and opens it.
    ///
    /// # Errors
    ///
    /// Returns the error reported by `source`, otherwise the same errors as
    /// [`Reader::from_bytes`].
    pub fn from_source(source: &dyn ByteSource, path: impl AsRef<Path>) -> GbkfResult<Self> {
        let data = source.read_all(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Whether the buffer ends with a matching SHA-256 footer.
    #[must_use]
    pub const fn verifies_checksum(&self) -> bool {
        self.footer.is_verified()
    }

    /// Result of the footer check.
    #[must_use]
    pub const fn footer_status(&self) -> FooterStatus {
        self.footer
    }

    /// Decoded header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Raw buffer, footer included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Codec/container version.
    #[must_use]
    pub const fn format_version(&self) -> u8 {
        self.header.format_version
    }

    /// Application-level schema id.
    #[must_use]
    pub const fn specification_id(&self) -> u32 {
        self.header.specification_id
    }

    /// Schema revision.
    #[must_use]
    pub const fn specification_version(&self) -> u16 {
        self.header.specification_version
    }

    /// Raw encoding id of the MAIN string slot.
    #[must_use]
    pub const fn main_string_encoding(&self) -> u16 {
        self.header.main_string_encoding
    }

    /// Raw encoding id of the SECONDARY string slot.
    #[must_use]
    pub const fn secondary_string_encoding(&self) -> u16 {
        self.header.secondary_string_encoding
    }

    /// Byte length of every key.
    #[must_use]
    pub const fn key_width(&self) -> u8 {
        self.header.key_width
    }

    /// Entry count declared in the header.
    #[must_use]
    pub const fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// Decodes every entry.
    ///
    /// # Errors
    ///
    /// Returns the first decode error; no partial map is returned.
    pub fn keyed_entries(&self) -> GbkfResult<KeyedEntries> {
        decoder::decode_all(&self.data, &self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GbkfError;
    use crate::writer::Writer;

    #[test]
    fn test_reader_exposes_header() {
        let mut writer = Writer::new();
        writer.set_format_version(5);
        writer.set_specification_id(42);
        writer.set_specification_version(3);
        writer.set_key_width(2).unwrap();
        let bytes = writer.finalize(false, false).unwrap();

        let reader = Reader::from_bytes(bytes).expect("open");
        assert_eq!(reader.format_version(), 5);
        assert_eq!(reader.specification_id(), 42);
        assert_eq!(reader.specification_version(), 3);
        assert_eq!(reader.key_width(), 2);
        assert_eq!(reader.entry_count(), 0);
        assert_eq!(reader.main_string_encoding(), 3);
        assert_eq!(reader.secondary_string_encoding(), 1);
        assert_eq!(reader.footer_status(), FooterStatus::Absent);
        assert!(!reader.verifies_checksum());
        assert!(reader.keyed_entries().unwrap().is_empty());
    }

    #[test]
    fn test_magic_only_is_truncated() {
        assert!(matches!(
            Reader::from_bytes(b"gbkf".to_vec()),
            Err(GbkfError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_footer_mismatch_still_decodes() {
        let mut writer = Writer::new();
        writer.add_keyed_values_int32("n", 1, &[-5, 5]).unwrap();
        let mut bytes = writer.finalize(true, true).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        let reader = Reader::from_bytes(bytes).expect("open");
        assert_eq!(reader.footer_status(), FooterStatus::Mismatch);
        let entries = reader.keyed_entries().expect("decode");
        assert_eq!(entries.get("n").unwrap()[0].values::<i32>().unwrap(), &[-5, 5]);
    }
}

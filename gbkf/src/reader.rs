//! Exported read-only view over a GBKF buffer.

use gbkf_core::Reader;

use crate::error::GbkfFfiResult;
use crate::types::{GbkfFooterStatus, GbkfKeyedEntry};

/// Decoded header plus lazily decoded entries of a GBKF buffer.
#[derive(Debug, uniffi::Object)]
pub struct GbkfReader(Reader);

#[uniffi::export]
impl GbkfReader {
    /// Opens an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than a header or does not
    /// start with the `gbkf` magic.
    #[uniffi::constructor]
    pub fn from_bytes(data: Vec<u8>) -> GbkfFfiResult<Self> {
        Ok(Self(Reader::from_bytes(data)?))
    }

    /// Reads and opens the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a GBKF buffer.
    #[uniffi::constructor]
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_path(path: String) -> GbkfFfiResult<Self> {
        Ok(Self(Reader::from_path(&path)?))
    }

    /// Whether the buffer ends with a matching SHA-256 footer.
    #[must_use]
    pub const fn verifies_checksum(&self) -> bool {
        self.0.verifies_checksum()
    }

    /// Result of the footer check.
    #[must_use]
    pub fn footer_status(&self) -> GbkfFooterStatus {
        self.0.footer_status().into()
    }

    /// Codec/container version.
    #[must_use]
    pub const fn format_version(&self) -> u8 {
        self.0.format_version()
    }

    /// Application-level schema id.
    #[must_use]
    pub const fn specification_id(&self) -> u32 {
        self.0.specification_id()
    }

    /// Schema revision.
    #[must_use]
    pub const fn specification_version(&self) -> u16 {
        self.0.specification_version()
    }

    /// Raw encoding id of the MAIN string slot.
    #[must_use]
    pub const fn main_string_encoding(&self) -> u16 {
        self.0.main_string_encoding()
    }

    /// Raw encoding id of the SECONDARY string slot.
    #[must_use]
    pub const fn secondary_string_encoding(&self) -> u16 {
        self.0.secondary_string_encoding()
    }

    /// Byte length of every key.
    #[must_use]
    pub const fn key_width(&self) -> u8 {
        self.0.key_width()
    }

    /// Entry count declared in the header.
    #[must_use]
    pub const fn entry_count(&self) -> u32 {
        self.0.entry_count()
    }

    /// Decodes every entry, grouped by key in first-appearance order.
    ///
    /// # Errors
    ///
    /// Returns the first decode error.
    pub fn keyed_entries(&self) -> GbkfFfiResult<Vec<GbkfKeyedEntry>> {
        let entries = self.0.keyed_entries()?;
        Ok(entries
            .into_iter()
            .flat_map(|(key, group)| {
                group
                    .into_iter()
                    .map(move |entry| GbkfKeyedEntry::new(&key, entry))
            })
            .collect())
    }
}

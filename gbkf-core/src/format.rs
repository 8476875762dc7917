//! Container format constants and layout definitions.
//!
//! Every multi-byte field of the format is little-endian.

// Layout comments describe binary structure, not Rust identifiers
#![allow(clippy::doc_markdown)]


/// Magic bytes at the start of every GBKF buffer.
pub const MAGIC: &[u8; 4] = b"gbkf";


/// Byte offset of the format version (u8).
pub const FORMAT_VERSION_OFFSET: usize = MAGIC.len();

/// Byte offset of the specification id (u32 LE).
pub const SPECIFICATION_ID_OFFSET: usize = FORMAT_VERSION_OFFSET + 1;

/// Byte offset of the specification version (u16 LE).
pub const SPECIFICATION_VERSION_OFFSET: usize = SPECIFICATION_ID_OFFSET + 4;

/// Byte offset of the main string encoding id (u16 LE).
pub const MAIN_STRING_ENCODING_OFFSET: usize = SPECIFICATION_VERSION_OFFSET + 2;

/// Byte offset of the secondary string encoding id (u16 LE).
pub const SECONDARY_STRING_ENCODING_OFFSET: usize = MAIN_STRING_ENCODING_OFFSET + 2;

/// Byte offset of the key width (u8).
pub const KEY_WIDTH_OFFSET: usize = SECONDARY_STRING_ENCODING_OFFSET + 2;

/// Byte offset of the entry count (u32 LE).
pub const ENTRY_COUNT_OFFSET: usize = KEY_WIDTH_OFFSET + 1;

/// Size of the header in bytes.
/// Layout: magic(4) + version(1) + spec_id(4) + spec_version(2)
///       + main_encoding(2) + secondary_encoding(2) + key_width(1) + entry_count(4) = 20
pub const HEADER_SIZE: usize = ENTRY_COUNT_OFFSET + 4;


/// Size of the fixed part of an entry that follows the key.
/// Layout: instance_id(4) + value_count(4) + type_tag(1) = 9
pub const ENTRY_PREFIX_SIZE: usize = 9;

/// Size of the string sub-header.
/// Layout: encoding_choice(1) + max_size(2) = 3
pub const STRING_PREFIX_SIZE: usize = 3;

/// Worst-case bytes per character in a fixed UTF-8 slot.
pub const UTF8_SLOT_FACTOR: usize = 4;


/// Size of the SHA-256 integrity footer in bytes.
pub const FOOTER_SIZE: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_constants() {
        assert_eq!(HEADER_SIZE, 20);
        assert_eq!(FORMAT_VERSION_OFFSET, 4);
        assert_eq!(SPECIFICATION_ID_OFFSET, 5);
        assert_eq!(SPECIFICATION_VERSION_OFFSET, 9);
        assert_eq!(MAIN_STRING_ENCODING_OFFSET, 11);
        assert_eq!(SECONDARY_STRING_ENCODING_OFFSET, 13);
        assert_eq!(KEY_WIDTH_OFFSET, 15);
        assert_eq!(ENTRY_COUNT_OFFSET, 16);
        assert_eq!(FOOTER_SIZE, 32);
    }
}

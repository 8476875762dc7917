//! Wire tags for value kinds and string encodings.

use strum::{Display, EnumIter};

use crate::error::{GbkfError, GbkfResult};

/// Kind of the values stored in a keyed entry.
///
/// The discriminants are the tag bytes written on the wire. They are not
/// contiguous and must match across implementations.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ValueType {
    /// Untyped bytes; `value_count` is the byte length.
    #[strum(serialize = "BLOB")]
    Blob = 0,
    /// Bit-packed booleans.
    #[strum(serialize = "BOOLEAN")]
    Boolean = 1,
    /// Strings in the ASCII, Latin-1 or UTF-8 encoding.
    #[strum(serialize = "STRING")]
    String = 12,
    /// Signed 8-bit integers.
    #[strum(serialize = "INT8")]
    Int8 = 20,
    /// Signed 32-bit integers.
    #[strum(serialize = "INT32")]
    Int32 = 21,
    /// Signed 16-bit integers.
    #[strum(serialize = "INT16")]
    Int16 = 22,
    /// Signed 64-bit integers.
    #[strum(serialize = "INT64")]
    Int64 = 23,
    /// Unsigned 8-bit integers.
    #[strum(serialize = "UINT8")]
    UInt8 = 30,
    /// Unsigned 16-bit integers.
    #[strum(serialize = "UINT16")]
    UInt16 = 31,
    /// Unsigned 32-bit integers.
    #[strum(serialize = "UINT32")]
    UInt32 = 33,
    /// Unsigned 64-bit integers.
    #[strum(serialize = "UINT64")]
    UInt64 = 34,
    /// IEEE-754 single precision floats.
    #[strum(serialize = "FLOAT32")]
    Float32 = 40,
    /// IEEE-754 double precision floats.
    #[strum(serialize = "FLOAT64")]
    Float64 = 41,
}

impl ValueType {
    /// Returns the tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Parses a tag byte.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::UnsupportedType`] for bytes outside the tag set.
    pub fn from_tag(tag: u8) -> GbkfResult<Self> {
        Ok(match tag {
            0 => Self::Blob,
            1 => Self::Boolean,
            12 => Self::String,
            20 => Self::Int8,
            21 => Self::Int32,
            22 => Self::Int16,
            23 => Self::Int64,
            30 => Self::UInt8,
            31 => Self::UInt16,
            33 => Self::UInt32,
            34 => Self::UInt64,
            40 => Self::Float32,
            41 => Self::Float64,
            other => return Err(GbkfError::UnsupportedType(other)),
        })
    }

    /// Width in bytes of one value for the fixed-width kinds.
    ///
    /// `None` for booleans and strings, whose payload has its own sub-layout.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Blob | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Boolean | Self::String => None,
        }
    }
}

/// Text encoding declared in the header for one of the two string slots.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum StringEncoding {
    /// No encoding declared; strings cannot use this slot.
    #[strum(serialize = "UNDEFINED")]
    Undefined = 0,
    /// 7-bit ASCII, one byte per character.
    #[strum(serialize = "ASCII")]
    Ascii = 1,
    /// ISO 8859-1, one byte per character.
    #[strum(serialize = "LATIN1")]
    Latin1 = 2,
    /// UTF-8, up to four bytes per character.
    #[strum(serialize = "UTF8")]
    Utf8 = 3,
}

impl StringEncoding {
    /// Returns the header id.
    #[must_use]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Parses a header id.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::UnsupportedEncoding`] for unknown ids.
    pub fn from_id(id: u16) -> GbkfResult<Self> {
        Ok(match id {
            0 => Self::Undefined,
            1 => Self::Ascii,
            2 => Self::Latin1,
            3 => Self::Utf8,
            other => return Err(GbkfError::UnsupportedEncoding(other)),
        })
    }

    /// Width in bytes of a fixed slot holding `max_size` characters.
    #[must_use]
    pub const fn slot_width(self, max_size: u16) -> usize {
        match self {
            Self::Utf8 => max_size as usize * crate::format::UTF8_SLOT_FACTOR,
            Self::Undefined | Self::Ascii | Self::Latin1 => max_size as usize,
        }
    }
}

/// Which header encoding a string entry uses.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum EncodingChoice {
    /// The main string encoding of the header.
    #[default]
    #[strum(serialize = "MAIN")]
    Main = 0,
    /// The secondary string encoding of the header.
    #[strum(serialize = "SECONDARY")]
    Secondary = 1,
}

impl EncodingChoice {
    /// Returns the wire byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Parses a wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::CorruptedData`] for bytes other than 0 and 1.
    pub fn from_byte(byte: u8) -> GbkfResult<Self> {
        match byte {
            0 => Ok(Self::Main),
            1 => Ok(Self::Secondary),
            other => Err(GbkfError::corrupted(format!(
                "unknown string encoding choice {other}"
            ))),
        }
    }
}

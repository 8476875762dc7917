//! Records and enums shared by the exported reader and writer.

use gbkf_core::{EncodingChoice, FooterStatus, KeyedEntry, StringEncoding, Values};

use crate::error::GbkfFfiResult;

/// Text encoding of a header string slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum GbkfStringEncoding {
    /// No encoding declared.
    Undefined,
    /// 7-bit ASCII.
    Ascii,
    /// ISO 8859-1.
    Latin1,
    /// UTF-8.
    Utf8,
}

impl From<GbkfStringEncoding> for StringEncoding {
    fn from(value: GbkfStringEncoding) -> Self {
        match value {
            GbkfStringEncoding::Undefined => Self::Undefined,
            GbkfStringEncoding::Ascii => Self::Ascii,
            GbkfStringEncoding::Latin1 => Self::Latin1,
            GbkfStringEncoding::Utf8 => Self::Utf8,
        }
    }
}

impl From<StringEncoding> for GbkfStringEncoding {
    fn from(value: StringEncoding) -> Self {
        match value {
            StringEncoding::Undefined => Self::Undefined,
            StringEncoding::Ascii => Self::Ascii,
            StringEncoding::Latin1 => Self::Latin1,
            StringEncoding::Utf8 => Self::Utf8,
        }
    }
}

/// Parses a raw header encoding id, as returned by the reader getters.
///
/// # Errors
///
/// Returns an error for ids outside the known encodings.
#[uniffi::export]
pub fn string_encoding_from_id(id: u16) -> GbkfFfiResult<GbkfStringEncoding> {
    Ok(StringEncoding::from_id(id)?.into())
}

/// Header slot selected by a string entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum GbkfEncodingChoice {
    /// The MAIN string encoding.
    Main,
    /// The SECONDARY string encoding.
    Secondary,
}

impl From<GbkfEncodingChoice> for EncodingChoice {
    fn from(value: GbkfEncodingChoice) -> Self {
        match value {
            GbkfEncodingChoice::Main => Self::Main,
            GbkfEncodingChoice::Secondary => Self::Secondary,
        }
    }
}

/// Outcome of the integrity footer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum GbkfFooterStatus {
    /// The footer matches.
    Verified,
    /// A footer-sized tail is present but does not match.
    Mismatch,
    /// The buffer is too short to carry a footer.
    Absent,
}

impl From<FooterStatus> for GbkfFooterStatus {
    fn from(value: FooterStatus) -> Self {
        match value {
            FooterStatus::Verified => Self::Verified,
            FooterStatus::Mismatch => Self::Mismatch,
            FooterStatus::Absent => Self::Absent,
        }
    }
}

/// Values of one entry, one variant per kind.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum GbkfValues {
    /// Raw bytes.
    Blob {
        /// Stored bytes.
        bytes: Vec<u8>,
    },
    /// Booleans.
    Boolean {
        /// Stored values.
        values: Vec<bool>,
    },
    /// Strings of any encoding.
    Text {
        /// Stored values.
        values: Vec<String>,
    },
    /// `i8` values.
    Int8 {
        /// Stored values.
        values: Vec<i8>,
    },
    /// `i16` values.
    Int16 {
        /// Stored values.
        values: Vec<i16>,
    },
    /// `i32` values.
    Int32 {
        /// Stored values.
        values: Vec<i32>,
    },
    /// `i64` values.
    Int64 {
        /// Stored values.
        values: Vec<i64>,
    },
    /// `u8` values.
    UInt8 {
        /// Stored values.
        values: Vec<u8>,
    },
    /// `u16` values.
    UInt16 {
        /// Stored values.
        values: Vec<u16>,
    },
    /// `u32` values.
    UInt32 {
        /// Stored values.
        values: Vec<u32>,
    },
    /// `u64` values.
    UInt64 {
        /// Stored values.
        values: Vec<u64>,
    },
    /// `f32` values.
    Float32 {
        /// Stored values.
        values: Vec<f32>,
    },
    /// `f64` values.
    Float64 {
        /// Stored values.
        values: Vec<f64>,
    },
}

impl From<Values> for GbkfValues {
    fn from(values: Values) -> Self {
        match values {
            Values::Blob(bytes) => Self::Blob { bytes },
            Values::Boolean(values) => Self::Boolean { values },
            Values::String(values) => Self::Text { values },
            Values::Int8(values) => Self::Int8 { values },
            Values::Int16(values) => Self::Int16 { values },
            Values::Int32(values) => Self::Int32 { values },
            Values::Int64(values) => Self::Int64 { values },
            Values::UInt8(values) => Self::UInt8 { values },
            Values::UInt16(values) => Self::UInt16 { values },
            Values::UInt32(values) => Self::UInt32 { values },
            Values::UInt64(values) => Self::UInt64 { values },
            Values::Float32(values) => Self::Float32 { values },
            Values::Float64(values) => Self::Float64 { values },
        }
    }
}

/// One decoded entry together with its key.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GbkfKeyedEntry {
    /// Entry key.
    pub key: String,
    /// Caller-assigned discriminator.
    pub instance_id: u32,
    /// Decoded values.
    pub values: GbkfValues,
}

impl GbkfKeyedEntry {
    pub(crate) fn new(key: &str, entry: KeyedEntry) -> Self {
        Self {
            key: key.to_owned(),
            instance_id: entry.instance_id,
            values: entry.into_values().into(),
        }
    }
}

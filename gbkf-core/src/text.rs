//! Transcoding between Rust strings and the three on-wire text encodings.

use crate::error::{GbkfError, GbkfResult};
use crate::value_type::StringEncoding;

/// Encodes `value` for storage, dropping trailing NUL characters first.
///
/// # Errors
///
/// Returns [`GbkfError::InvalidString`] if a character cannot be represented
/// in `encoding`, and [`GbkfError::UnsupportedEncoding`] for
/// [`StringEncoding::Undefined`].
pub fn encode(encoding: StringEncoding, value: &str) -> GbkfResult<Vec<u8>> {
    let trimmed = value.trim_end_matches('\0');
    match encoding {
        StringEncoding::Ascii => {
            if trimmed.is_ascii() {
                Ok(trimmed.as_bytes().to_vec())
            } else {
                Err(invalid(encoding, value, "contains non-ASCII characters"))
            }
        }
        StringEncoding::Latin1 => trimmed
            .chars()
            .map(|c| {
                u8::try_from(c).map_err(|_| {
                    invalid(
                        encoding,
                        value,
                        &format!("character {c:?} is outside ISO 8859-1"),
                    )
                })
            })
            .collect(),
        StringEncoding::Utf8 => Ok(trimmed.as_bytes().to_vec()),
        StringEncoding::Undefined => Err(GbkfError::UnsupportedEncoding(encoding.id())),
    }
}

/// Decodes stored bytes into a Rust string.
///
/// # Errors
///
/// Returns [`GbkfError::CorruptedData`] if the bytes are not valid in
/// `encoding`, and [`GbkfError::UnsupportedEncoding`] for
/// [`StringEncoding::Undefined`].
pub fn decode(encoding: StringEncoding, bytes: &[u8]) -> GbkfResult<String> {
    match encoding {
        StringEncoding::Ascii => {
            if bytes.is_ascii() {
                Ok(bytes.iter().copied().map(char::from).collect())
            } else {
                Err(GbkfError::corrupted(format!(
                    "ASCII string contains byte >= 0x80: {}",
                    hex::encode(bytes)
                )))
            }
        }
        StringEncoding::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
        StringEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|err| {
            GbkfError::corrupted(format!("invalid UTF-8 string: {err}"))
        }),
        StringEncoding::Undefined => Err(GbkfError::UnsupportedEncoding(encoding.id())),
    }
}

fn invalid(encoding: StringEncoding, value: &str, reason: &str) -> GbkfError {
    GbkfError::InvalidString {
        encoding,
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

//! Payload serializers for each value kind.
//!
//! Each function returns the bytes that follow an entry's type tag. Nothing is
//! appended to a container here, so a rejected value never leaves a partial
//! entry behind.

use crate::cursor::ByteWriter;
use crate::error::{GbkfError, GbkfResult};
use crate::text;
use crate::value_type::{EncodingChoice, StringEncoding};

/// Number of valid bits in the final packed byte of a boolean payload.
///
/// `count % 8`, except that a nonzero multiple of 8 yields 8.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn boolean_last_bits(count: usize) -> u8 {
    match count % 8 {
        0 if count > 0 => 8,
        rem => rem as u8,
    }
}

/// Fixed-width little-endian values back to back.
#[must_use]
pub fn fixed<T: Copy, const N: usize>(values: &[T], to_le: fn(T) -> [u8; N]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * N);
    for value in values {
        buf.extend_from_slice(&to_le(*value));
    }
    buf
}

/// `last_bits` byte followed by the values packed LSB-first.
#[must_use]
pub fn booleans(values: &[bool]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + values.len().div_ceil(8));
    buf.push(boolean_last_bits(values.len()));
    for chunk in values.chunks(8) {
        let byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &set)| acc | (u8::from(set) << bit));
        buf.push(byte);
    }
    buf
}

/// Rejects infinite `f32` values.
///
/// # Errors
///
/// Returns [`GbkfError::ValueOutOfRange`] naming the first infinite value.
pub fn check_finite_f32(values: &[f32]) -> GbkfResult<()> {
    match values.iter().position(|v| v.is_infinite()) {
        Some(index) => Err(GbkfError::out_of_range(format!(
            "FLOAT32 value {} at index {index} is infinite",
            values[index]
        ))),
        None => Ok(()),
    }
}

/// Rejects infinite `f64` values.
///
/// # Errors
///
/// Returns [`GbkfError::ValueOutOfRange`] naming the first infinite value.
pub fn check_finite_f64(values: &[f64]) -> GbkfResult<()> {
    match values.iter().position(|v| v.is_infinite()) {
        Some(index) => Err(GbkfError::out_of_range(format!(
            "FLOAT64 value {} at index {index} is infinite",
            values[index]
        ))),
        None => Ok(()),
    }
}

/// Narrows `f64` values to `f32`.
///
/// NaN narrows to NaN.
///
/// # Errors
///
/// Returns [`GbkfError::ValueOutOfRange`] for values whose magnitude exceeds
/// `f32::MAX`, infinities included.
#[allow(clippy::cast_possible_truncation)]
pub fn narrow_to_f32(values: &[f64]) -> GbkfResult<Vec<f32>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value.abs() > f64::from(f32::MAX) {
                Err(GbkfError::out_of_range(format!(
                    "value {value} at index {index} does not fit in FLOAT32"
                )))
            } else {
                Ok(value as f32)
            }
        })
        .collect()
}

/// String sub-header and the values in fixed or dynamic layout.
///
/// # Errors
///
/// Returns:
/// - [`GbkfError::InvalidString`] if a value cannot be represented in
///   `encoding`, or a fixed-mode value contains an interior NUL
/// - [`GbkfError::ValueOutOfRange`] if a fixed-mode value does not fit its
///   slot, a dynamic value exceeds 65535 bytes, or the dynamic region
///   exceeds `u32::MAX` bytes
pub fn strings<S: AsRef<str>>(
    values: &[S],
    encoding: StringEncoding,
    choice: EncodingChoice,
    max_size: u16,
) -> GbkfResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut out = ByteWriter::new(&mut buf);
    out.put_u8(choice.byte());
    out.put_u16(max_size);

    if max_size > 0 {
        let width = encoding.slot_width(max_size);
        for value in values {
            let value = value.as_ref();
            let raw = text::encode(encoding, value)?;
            if raw.contains(&0) {
                return Err(GbkfError::InvalidString {
                    encoding,
                    value: value.to_owned(),
                    reason: "fixed-size strings cannot contain NUL".to_owned(),
                });
            }
            if raw.len() > width {
                return Err(GbkfError::out_of_range(format!(
                    "string {value:?} needs {} bytes, slot holds {width}",
                    raw.len()
                )));
            }
            out.put_padded(&raw, width);
        }
        return Ok(buf);
    }

    let mut encoded = Vec::with_capacity(values.len());
    let mut total: usize = 0;
    for value in values {
        let value = value.as_ref();
        let raw = text::encode(encoding, value)?;
        let len = u16::try_from(raw.len()).map_err(|_| {
            GbkfError::out_of_range(format!(
                "dynamic string of {} bytes exceeds {} bytes",
                raw.len(),
                u16::MAX
            ))
        })?;
        total += 2 + raw.len();
        encoded.push((len, raw));
    }
    let total = u32::try_from(total).map_err(|_| {
        GbkfError::out_of_range(format!("dynamic string region of {total} bytes"))
    })?;

    out.put_u32(total);
    for (len, raw) in &encoded {
        out.put_u16(*len);
        out.put_bytes(raw);
    }
    Ok(buf)
}

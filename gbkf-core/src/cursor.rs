//! Fixed-width little-endian reads and writes over borrowed byte buffers.
//!
//! [`ByteReader`] walks a `&[u8]` and fails with
//! [`GbkfError::TruncatedData`] instead of reading past the end.
//! [`ByteWriter`] appends to, or patches, a `Vec<u8>` it borrows.

use crate::error::{GbkfError, GbkfResult};

/// Forward-only reader over a borrowed buffer.
///
/// Each read advances the position by exactly the width of the field.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            ///
            /// # Errors
            ///
            /// Returns [`GbkfError::TruncatedData`] if the field extends past the buffer.
            pub fn $name(&mut self) -> GbkfResult<$ty> {
                let raw = self.read_array::<{ std::mem::size_of::<$ty>() }>(stringify!($ty))?;
                Ok(<$ty>::from_le_bytes(raw))
            }
        )*
    };
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Creates a reader positioned at `pos`.
    #[must_use]
    pub const fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    /// Current absolute position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// Reads `len` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TruncatedData`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> GbkfResult<&'a [u8]> {
        self.take(len, "raw bytes")
    }

    /// Reads `len` raw bytes, naming `context` in the error on failure.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TruncatedData`] if fewer than `len` bytes remain.
    pub fn take(&mut self, len: usize, context: &str) -> GbkfResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| GbkfError::truncated(context, self.pos, len, self.bytes.len()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, context: &str) -> GbkfResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, context)?);
        Ok(out)
    }

    read_le! {
        /// Reads a `u8`.
        read_u8 => u8,
        /// Reads a little-endian `u16`.
        read_u16 => u16,
        /// Reads a little-endian `u32`.
        read_u32 => u32,
        /// Reads a little-endian `u64`.
        read_u64 => u64,
        /// Reads an `i8`.
        read_i8 => i8,
        /// Reads a little-endian `i16`.
        read_i16 => i16,
        /// Reads a little-endian `i32`.
        read_i32 => i32,
        /// Reads a little-endian `i64`.
        read_i64 => i64,
        /// Reads a little-endian IEEE-754 `f32`.
        read_f32 => f32,
        /// Reads a little-endian IEEE-754 `f64`.
        read_f64 => f64,
    }
}

/// Appending writer over a borrowed growable buffer.
#[derive(Debug)]
pub struct ByteWriter<'a> {
    buf: &'a mut Vec<u8>,
}

macro_rules! put_le {
    ($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            pub fn $name(&mut self, value: $ty) {
                self.buf.extend_from_slice(&value.to_le_bytes());
            }
        )*
    };
}

impl<'a> ByteWriter<'a> {
    /// Wraps `buf`; writes go to its end.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    /// Number of bytes in the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends `bytes` followed by NUL padding up to `width` bytes.
    ///
    /// Callers guarantee `bytes.len() <= width`.
    pub fn put_padded(&mut self, bytes: &[u8], width: usize) {
        self.buf.extend_from_slice(bytes);
        self.buf
            .resize(self.buf.len() + width.saturating_sub(bytes.len()), 0);
    }

    put_le! {
        /// Appends a `u8`.
        put_u8 => u8,
        /// Appends a little-endian `u16`.
        put_u16 => u16,
        /// Appends a little-endian `u32`.
        put_u32 => u32,
        /// Appends a little-endian `u64`.
        put_u64 => u64,
        /// Appends an `i8`.
        put_i8 => i8,
        /// Appends a little-endian `i16`.
        put_i16 => i16,
        /// Appends a little-endian `i32`.
        put_i32 => i32,
        /// Appends a little-endian `i64`.
        put_i64 => i64,
        /// Appends a little-endian IEEE-754 `f32`.
        put_f32 => f32,
        /// Appends a little-endian IEEE-754 `f64`.
        put_f64 => f64,
    }

    /// Overwrites `bytes.len()` bytes starting at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TruncatedData`] if the patched range is not inside the buffer.
    pub fn patch(&mut self, pos: usize, bytes: &[u8]) -> GbkfResult<()> {
        let len = self.buf.len();
        let target = pos
            .checked_add(bytes.len())
            .and_then(|end| self.buf.get_mut(pos..end))
            .ok_or_else(|| GbkfError::truncated("patch target", pos, bytes.len(), len))?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Overwrites a little-endian `u32` at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TruncatedData`] if `pos + 4` is past the end of the buffer.
    pub fn patch_u32(&mut self, pos: usize, value: u32) -> GbkfResult<()> {
        self.patch(pos, &value.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_little_endian_and_advance() {
        let bytes = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xff];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let bytes = [0u8; 3];
        let mut reader = ByteReader::at(&bytes, 1);
        match reader.read_u32() {
            Err(GbkfError::TruncatedData {
                offset,
                needed,
                available,
                ..
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_take_rejects_overflowing_length() {
        let bytes = [0u8; 4];
        let mut reader = ByteReader::at(&bytes, 2);
        assert!(matches!(
            reader.read_bytes(usize::MAX),
            Err(GbkfError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_floats_are_bit_exact() {
        let mut buf = Vec::new();
        let mut writer = ByteWriter::new(&mut buf);
        writer.put_f32(-0.0);
        writer.put_f64(f64::from_bits(0x7ff8_0000_0000_0001));
        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_f32().unwrap().to_bits(), (-0.0f32).to_bits());
        assert_eq!(reader.read_f64().unwrap().to_bits(), 0x7ff8_0000_0000_0001);
    }

    #[test]
    fn test_writer_appends_and_patches() {
        let mut buf = vec![0xaa];
        let mut writer = ByteWriter::new(&mut buf);
        writer.put_u16(0x0102);
        writer.put_i64(-2);
        writer.put_padded(b"ab", 4);
        writer.patch_u32(1, 0xdead_beef).unwrap();
        assert!(writer.patch_u32(12, 1).is_err());
        assert_eq!(writer.len(), 15);
        assert_eq!(&buf[..5], &[0xaa, 0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(&buf[11..], b"ab\0\0");
    }
}

//! Entry stream decoder.
//!
//! Walks the body of a buffer in a single pass, `entry_count` times from the
//! end of the header. Each payload reader consumes exactly the bytes implied
//! by the entry's tag and value count.

// Wire lengths are u32 and widen into usize
#![allow(clippy::cast_possible_truncation)]

use log::trace;

use crate::cursor::ByteReader;
use crate::encoder::boolean_last_bits;
use crate::entry::{KeyedEntry, StringLayout, Values};
use crate::entry_map::KeyedEntries;
use crate::error::{GbkfError, GbkfResult};
use crate::format::HEADER_SIZE;
use crate::header::Header;
use crate::text;
use crate::value_type::{EncodingChoice, StringEncoding, ValueType};

/// Decodes every entry declared by `header`.
///
/// `bytes` is the whole buffer, header included. Bytes left after the last
/// entry (such as an integrity footer) are ignored.
///
/// # Errors
///
/// Returns:
/// - [`GbkfError::TruncatedData`] if an entry extends past the buffer
/// - [`GbkfError::UnsupportedType`] for an unknown type tag
/// - [`GbkfError::UnsupportedEncoding`] if a string entry selects an unknown
///   or undefined header encoding
/// - [`GbkfError::CorruptedData`] for structurally impossible payloads
pub fn decode_all(bytes: &[u8], header: &Header) -> GbkfResult<KeyedEntries> {
    if header.key_width == 0 && header.entry_count > 0 {
        return Err(GbkfError::corrupted("header declares entries with key width 0"));
    }

    let mut reader = ByteReader::at(bytes, HEADER_SIZE);
    let mut entries = KeyedEntries::new();
    for index in 0..header.entry_count {
        let offset = reader.position();
        let (key, entry) = decode_entry(&mut reader, header)?;
        trace!(
            "decoded entry {index} at offset {offset}: key={key:?} type={} count={}",
            entry.value_type(),
            entry.len()
        );
        entries.push(key, entry);
    }
    Ok(entries)
}

fn decode_entry(reader: &mut ByteReader<'_>, header: &Header) -> GbkfResult<(String, KeyedEntry)> {
    let key = read_key(reader, header.key_width)?;
    let instance_id = reader.read_u32()?;
    let count = reader.read_u32()? as usize;
    let value_type = ValueType::from_tag(reader.read_u8()?)?;

    let entry = match value_type {
        ValueType::Blob => {
            let raw = reader.take(count, "BLOB payload")?;
            KeyedEntry::blob(instance_id, raw.to_vec())
        }
        ValueType::Boolean => {
            KeyedEntry::from_values(instance_id, read_booleans(reader, count)?)
        }
        ValueType::String => {
            let (values, layout) = read_strings(reader, header, count)?;
            KeyedEntry::with_values(instance_id, Values::String(values), Some(layout))
        }
        ValueType::Int8 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, i8::from_le_bytes)?)
        }
        ValueType::Int16 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, i16::from_le_bytes)?)
        }
        ValueType::Int32 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, i32::from_le_bytes)?)
        }
        ValueType::Int64 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, i64::from_le_bytes)?)
        }
        ValueType::UInt8 => {
            let raw = reader.take(count, "UINT8 payload")?;
            KeyedEntry::from_values(instance_id, raw.to_vec())
        }
        ValueType::UInt16 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, u16::from_le_bytes)?)
        }
        ValueType::UInt32 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, u32::from_le_bytes)?)
        }
        ValueType::UInt64 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, u64::from_le_bytes)?)
        }
        ValueType::Float32 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, f32::from_le_bytes)?)
        }
        ValueType::Float64 => {
            KeyedEntry::from_values(instance_id, read_fixed(reader, count, f64::from_le_bytes)?)
        }
    };
    Ok((key, entry))
}

fn read_key(reader: &mut ByteReader<'_>, key_width: u8) -> GbkfResult<String> {
    let offset = reader.position();
    let raw = reader.take(usize::from(key_width), "key")?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    std::str::from_utf8(&raw[..end])
        .map(str::to_owned)
        .map_err(|_| {
            GbkfError::corrupted(format!(
                "key at offset {offset} is not valid UTF-8: {}",
                hex::encode(raw)
            ))
        })
}

fn read_fixed<T, const N: usize>(
    reader: &mut ByteReader<'_>,
    count: usize,
    from_le: fn([u8; N]) -> T,
) -> GbkfResult<Vec<T>> {
    // An overflowing length can never fit the buffer; let `take` report it.
    let len = count.checked_mul(N).unwrap_or(usize::MAX);
    let raw = reader.take(len, "fixed-width values")?;
    Ok(raw
        .chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(chunk);
            from_le(bytes)
        })
        .collect())
}

fn read_booleans(reader: &mut ByteReader<'_>, count: usize) -> GbkfResult<Vec<bool>> {
    let last_bits = reader.read_u8()?;
    let expected = boolean_last_bits(count);
    if last_bits != expected {
        return Err(GbkfError::corrupted(format!(
            "boolean entry of {count} values declares {last_bits} bits in its last byte, expected {expected}"
        )));
    }
    let packed = reader.take(count.div_ceil(8), "BOOLEAN payload")?;
    Ok((0..count)
        .map(|i| (packed[i / 8] >> (i % 8)) & 1 == 1)
        .collect())
}

fn read_strings(
    reader: &mut ByteReader<'_>,
    header: &Header,
    count: usize,
) -> GbkfResult<(Vec<String>, StringLayout)> {
    let choice = EncodingChoice::from_byte(reader.read_u8()?)?;
    let max_size = reader.read_u16()?;
    let encoding = header.encoding(choice)?;
    if encoding == StringEncoding::Undefined {
        return Err(GbkfError::UnsupportedEncoding(encoding.id()));
    }
    let layout = StringLayout {
        choice,
        encoding,
        max_size,
    };

    if max_size > 0 {
        let width = encoding.slot_width(max_size);
        let len = count.checked_mul(width).unwrap_or(usize::MAX);
        let region = reader.take(len, "STRING slots")?;
        let values = region
            .chunks_exact(width)
            .map(|slot| {
                let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
                text::decode(encoding, &slot[..end])
            })
            .collect::<GbkfResult<Vec<_>>>()?;
        return Ok((values, layout));
    }

    let total = reader.read_u32()? as usize;
    let region = reader.take(total, "STRING dynamic region")?;
    let mut inner = ByteReader::new(region);
    // Every value needs at least its 2-byte length prefix.
    let mut values = Vec::with_capacity(count.min(region.len() / 2));
    for index in 0..count {
        let raw = inner
            .read_u16()
            .and_then(|len| inner.take(usize::from(len), "dynamic string"))
            .map_err(|_| {
                GbkfError::corrupted(format!(
                    "dynamic string region of {total} bytes ends inside value {index} of {count}"
                ))
            })?;
        values.push(text::decode(encoding, raw)?);
    }
    if inner.remaining() != 0 {
        return Err(GbkfError::corrupted(format!(
            "dynamic string region of {total} bytes has {} unused bytes",
            inner.remaining()
        )));
    }
    Ok((values, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ByteWriter;

    fn body(header: &Header, build: impl FnOnce(&mut ByteWriter<'_>)) -> Vec<u8> {
        let mut buf = header.encode().to_vec();
        build(&mut ByteWriter::new(&mut buf));
        buf
    }

    fn one_entry() -> Header {
        Header {
            key_width: 2,
            entry_count: 1,
            ..Header::default()
        }
    }

    #[test]
    fn test_decode_uint16_entry() {
        let header = one_entry();
        let bytes = body(&header, |w| {
            w.put_bytes(b"ID");
            w.put_u32(7);
            w.put_u32(3);
            w.put_u8(ValueType::UInt16.tag());
            for v in [1u16, 200, 300] {
                w.put_u16(v);
            }
        });
        let entries = decode_all(&bytes, &header).expect("decode");
        let id = entries.get("ID").expect("key");
        assert_eq!(id.len(), 1);
        assert_eq!(id[0].instance_id, 7);
        assert_eq!(id[0].value_type(), ValueType::UInt16);
        assert_eq!(id[0].values::<u16>().unwrap(), &[1, 200, 300]);
    }

    #[test]
    fn test_short_key_is_nul_terminated() {
        let header = Header {
            key_width: 4,
            entry_count: 1,
            ..Header::default()
        };
        let bytes = body(&header, |w| {
            w.put_bytes(b"ab\0\0");
            w.put_u32(0);
            w.put_u32(0);
            w.put_u8(ValueType::Int8.tag());
        });
        let entries = decode_all(&bytes, &header).expect("decode");
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["ab"]);
    }

    #[test]
    fn test_unknown_tag() {
        let header = one_entry();
        let bytes = body(&header, |w| {
            w.put_bytes(b"KK");
            w.put_u32(0);
            w.put_u32(0);
            w.put_u8(99);
        });
        assert!(matches!(
            decode_all(&bytes, &header),
            Err(GbkfError::UnsupportedType(99))
        ));
    }

    #[test]
    fn test_payload_overrun_is_truncated() {
        let header = one_entry();
        let bytes = body(&header, |w| {
            w.put_bytes(b"KK");
            w.put_u32(0);
            w.put_u32(u32::MAX);
            w.put_u8(ValueType::Int64.tag());
            w.put_i64(1);
        });
        assert!(matches!(
            decode_all(&bytes, &header),
            Err(GbkfError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_missing_entry_is_truncated() {
        let header = Header {
            entry_count: 2,
            ..one_entry()
        };
        let bytes = body(&header, |w| {
            w.put_bytes(b"KK");
            w.put_u32(0);
            w.put_u32(0);
            w.put_u8(ValueType::Blob.tag());
        });
        assert!(matches!(
            decode_all(&bytes, &header),
            Err(GbkfError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_inconsistent_last_bits() {
        let header = one_entry();
        let bytes = body(&header, |w| {
            w.put_bytes(b"BB");
            w.put_u32(0);
            w.put_u32(8);
            w.put_u8(ValueType::Boolean.tag());
            w.put_u8(0);
            w.put_u8(0xff);
        });
        assert!(matches!(
            decode_all(&bytes, &header),
            Err(GbkfError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_unused_boolean_bits_are_ignored() {
        let header = one_entry();
        let bytes = body(&header, |w| {
            w.put_bytes(b"BB");
            w.put_u32(0);
            w.put_u32(3);
            w.put_u8(ValueType::Boolean.tag());
            w.put_u8(3);
            w.put_u8(0b1111_1010);
        });
        let entries = decode_all(&bytes, &header).expect("decode");
        assert_eq!(
            entries.get("BB").unwrap()[0].values::<bool>().unwrap(),
            &[false, true, false]
        );
    }

    fn string_entry(choice: u8, max_size: u16, build: impl FnOnce(&mut ByteWriter<'_>)) -> Vec<u8> {
        let header = one_entry();
        body(&header, |w| {
            w.put_bytes(b"SS");
            w.put_u32(0);
            w.put_u32(2);
            w.put_u8(ValueType::String.tag());
            w.put_u8(choice);
            w.put_u16(max_size);
            build(w);
        })
    }

    #[test]
    fn test_dynamic_region_size_mismatch() {
        // Region declares one byte more than its values use.
        let bytes = string_entry(0, 0, |w| {
            w.put_u32(7);
            w.put_u16(1);
            w.put_bytes(b"a");
            w.put_u16(1);
            w.put_bytes(b"b");
            w.put_u8(0);
        });
        assert!(matches!(
            decode_all(&bytes, &one_entry()),
            Err(GbkfError::CorruptedData { .. })
        ));

        // Region ends before the second value does.
        let bytes = string_entry(0, 0, |w| {
            w.put_u32(5);
            w.put_u16(1);
            w.put_bytes(b"a");
            w.put_u16(1);
            w.put_bytes(b"b");
        });
        assert!(matches!(
            decode_all(&bytes, &one_entry()),
            Err(GbkfError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_fixed_slots_stop_at_nul() {
        let bytes = string_entry(1, 3, |w| {
            w.put_padded(b"ab", 3);
            w.put_padded(b"xyz", 3);
        });
        let entries = decode_all(&bytes, &one_entry()).expect("decode");
        let entry = &entries.get("SS").unwrap()[0];
        assert_eq!(entry.values::<String>().unwrap(), &["ab", "xyz"]);
        let layout = entry.string_layout().unwrap();
        assert_eq!(layout.choice, EncodingChoice::Secondary);
        assert_eq!(layout.encoding, StringEncoding::Ascii);
        assert_eq!(layout.max_size, 3);
    }

    #[test]
    fn test_unknown_encoding_choice() {
        let bytes = string_entry(2, 0, |w| w.put_u32(0));
        assert!(matches!(
            decode_all(&bytes, &one_entry()),
            Err(GbkfError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_selected_encoding_must_be_known() {
        let header = Header {
            secondary_string_encoding: 12,
            ..one_entry()
        };
        let mut bytes = string_entry(1, 0, |w| w.put_u32(0));
        bytes[..HEADER_SIZE].copy_from_slice(&header.encode());
        assert!(matches!(
            decode_all(&bytes, &header),
            Err(GbkfError::UnsupportedEncoding(12))
        ));
    }
}

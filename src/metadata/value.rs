use bytes::Bytes;

use crate::error::{DirectoryError, ExifError, ExifResult};
use crate::metadata::cursor::MetadataCursor;
use crate::metadata::reader::DirectoryEntry;
use crate::reader::{EndianAwareReader, Endianness};
use crate::tiff::tags::Type;
use crate::tiff::{Rational, SRational, Value};

/// Decode the value of a raw directory entry.
///
/// Values of at most 4 bytes are read from the entry's own value field. Larger values are read
/// from the offset stored there, relative to the start of `stream`.
pub fn decode_value(
    stream: &Bytes,
    entry: &DirectoryEntry,
    endianness: Endianness,
) -> ExifResult<(Type, Value)> {
    let field_type = entry
        .field_type()
        .ok_or(ExifError::UnsupportedValueType {
            tag: entry.tag,
            type_code: entry.type_code,
        })?;

    let byte_len = entry.count as u64 * field_type.byte_len() as u64;
    let mut cursor = MetadataCursor::new(stream, endianness);
    if byte_len <= 4 {
        let offset = entry
            .value_field_offset()
            .ok_or(DirectoryError::OutOfBounds {
                offset: entry.offset,
                length: 12,
                buffer_len: stream.len() as u64,
            })?;
        cursor.seek(offset);
    } else {
        cursor.seek(endianness.u32_from_bytes(entry.value_field).into());
    }

    let data = cursor.read(byte_len)?;
    let value = read_values(data, field_type, entry.count as usize)?;
    Ok((field_type, value))
}

fn read_values(mut data: EndianAwareReader, field_type: Type, count: usize) -> ExifResult<Value> {
    let value = match field_type {
        Type::BYTE => Value::Byte(data.as_ref().to_vec()),
        Type::UNDEFINED => Value::Undefined(data.as_ref().to_vec()),
        Type::ASCII => Value::Ascii(read_string(data.as_ref())),
        Type::UTF8 => Value::Utf8(read_string(data.as_ref())),
        Type::SBYTE => Value::SignedByte(read_n(count, || data.read_i8())?),
        Type::SHORT => Value::Short(read_n(count, || data.read_u16())?),
        Type::SSHORT => Value::SignedShort(read_n(count, || data.read_i16())?),
        Type::LONG => Value::Long(read_n(count, || data.read_u32())?),
        Type::SLONG => Value::SignedLong(read_n(count, || data.read_i32())?),
        Type::FLOAT => Value::Float(read_n(count, || data.read_f32())?),
        Type::DOUBLE => Value::Double(read_n(count, || data.read_f64())?),
        Type::RATIONAL => Value::Rational(read_n(count, || {
            Ok(Rational {
                numerator: data.read_u32()?,
                denominator: data.read_u32()?,
            })
        })?),
        Type::SRATIONAL => Value::SRational(read_n(count, || {
            Ok(SRational {
                numerator: data.read_i32()?,
                denominator: data.read_i32()?,
            })
        })?),
    };
    Ok(value)
}

fn read_n<T>(count: usize, mut read: impl FnMut() -> ExifResult<T>) -> ExifResult<Vec<T>> {
    (0..count).map(|_| read()).collect()
}

/// The first `count - 1` bytes; the last byte is the NUL terminator.
fn read_string(bytes: &[u8]) -> String {
    let text = match bytes.split_last() {
        Some((_, text)) => text,
        None => bytes,
    };
    String::from_utf8_lossy(text).into_owned()
}

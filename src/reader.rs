//! Endianness-aware reads over shared byte buffers.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use bytes::buf::Reader;
use bytes::{Buf, Bytes};

use crate::error::ExifResult;

/// Endianness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Little Endian
    LittleEndian,
    /// Big Endian
    BigEndian,
}

impl Endianness {
    /// Interpret a TIFF byte order mark: `II` (0x4949) or `MM` (0x4D4D).
    pub fn from_byte_order_mark(mark: u16) -> Option<Self> {
        match mark {
            0x4949 => Some(Self::LittleEndian),
            0x4D4D => Some(Self::BigEndian),
            _ => None,
        }
    }

    /// Decode a u32 from the 4-byte value field of a directory entry.
    pub(crate) fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endianness::LittleEndian => LittleEndian::read_u32(&bytes),
            Endianness::BigEndian => BigEndian::read_u32(&bytes),
        }
    }
}

/// A reader over a zero-copy slice of the source buffer that decodes multi-byte values with a
/// fixed endianness.
pub(crate) struct EndianAwareReader {
    reader: Reader<Bytes>,
    endianness: Endianness,
}

impl EndianAwareReader {
    pub(crate) fn new(bytes: Bytes, endianness: Endianness) -> Self {
        Self {
            reader: bytes.reader(),
            endianness,
        }
    }

    /// Read a i8 from the cursor, advancing the internal state by 1 byte.
    pub(crate) fn read_i8(&mut self) -> ExifResult<i8> {
        Ok(self.reader.read_i8()?)
    }

    pub(crate) fn read_u16(&mut self) -> ExifResult<u16> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_u16::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_u16::<BigEndian>()?),
        }
    }

    pub(crate) fn read_i16(&mut self) -> ExifResult<i16> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_i16::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_i16::<BigEndian>()?),
        }
    }

    pub(crate) fn read_u32(&mut self) -> ExifResult<u32> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_u32::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_u32::<BigEndian>()?),
        }
    }

    pub(crate) fn read_i32(&mut self) -> ExifResult<i32> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_i32::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_i32::<BigEndian>()?),
        }
    }

    pub(crate) fn read_f32(&mut self) -> ExifResult<f32> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_f32::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_f32::<BigEndian>()?),
        }
    }

    pub(crate) fn read_f64(&mut self) -> ExifResult<f64> {
        match self.endianness {
            Endianness::LittleEndian => Ok(self.reader.read_f64::<LittleEndian>()?),
            Endianness::BigEndian => Ok(self.reader.read_f64::<BigEndian>()?),
        }
    }
}

impl AsRef<[u8]> for EndianAwareReader {
    fn as_ref(&self) -> &[u8] {
        self.reader.get_ref().as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_mark() {
        assert_eq!(
            Endianness::from_byte_order_mark(0x4949),
            Some(Endianness::LittleEndian)
        );
        assert_eq!(
            Endianness::from_byte_order_mark(0x4D4D),
            Some(Endianness::BigEndian)
        );
        assert_eq!(Endianness::from_byte_order_mark(0x4949 ^ 1), None);
    }

    #[test]
    #[rustfmt::skip]
    fn test_reads_follow_endianness() {
        let bytes = Bytes::from_static(&[0x12, 0x34, 0x56, 0x78]);

        let mut le = EndianAwareReader::new(bytes.clone(), Endianness::LittleEndian);
        assert_eq!(le.read_u16().unwrap(), 0x3412);
        assert_eq!(le.read_u16().unwrap(), 0x7856);

        let mut be = EndianAwareReader::new(bytes.clone(), Endianness::BigEndian);
        assert_eq!(be.read_u32().unwrap(), 0x12345678);

        assert_eq!(Endianness::LittleEndian.u32_from_bytes([0x12, 0x34, 0x56, 0x78]), 0x78563412);
        assert_eq!(Endianness::BigEndian.u32_from_bytes([0x12, 0x34, 0x56, 0x78]), 0x12345678);
    }

    #[test]
    fn test_read_past_end_is_error() {
        let mut reader =
            EndianAwareReader::new(Bytes::from_static(&[1, 2, 3]), Endianness::BigEndian);
        assert!(reader.read_u32().is_err());
    }
}

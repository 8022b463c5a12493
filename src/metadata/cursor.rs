use bytes::Bytes;

use crate::error::{DirectoryError, ExifResult};
use crate::reader::{EndianAwareReader, Endianness};

/// Check that `length` bytes starting at `offset` lie within a buffer of `buffer_len` bytes.
pub(crate) fn checked_range(
    offset: u64,
    length: u64,
    buffer_len: usize,
) -> ExifResult<std::ops::Range<usize>> {
    let out_of_bounds = || DirectoryError::OutOfBounds {
        offset,
        length,
        buffer_len: buffer_len as u64,
    };
    let end = offset.checked_add(length).ok_or_else(out_of_bounds)?;
    if end > buffer_len as u64 {
        return Err(out_of_bounds().into());
    }
    Ok(offset as usize..end as usize)
}

/// A position in the TIFF stream with bounds-checked, zero-copy reads.
pub(crate) struct MetadataCursor<'a> {
    data: &'a Bytes,
    offset: u64,
    endianness: Endianness,
}

impl<'a> MetadataCursor<'a> {
    pub fn new(data: &'a Bytes, endianness: Endianness) -> Self {
        Self {
            data,
            offset: 0,
            endianness,
        }
    }

    pub fn new_with_offset(data: &'a Bytes, endianness: Endianness, offset: u64) -> Self {
        Self {
            data,
            offset,
            endianness,
        }
    }

    pub fn seek(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Advance cursor position by a set amount
    pub(crate) fn advance(&mut self, amount: u64) {
        self.offset += amount;
    }

    /// Read the given number of bytes, advancing the internal cursor state by the same amount.
    ///
    /// The returned reader shares the underlying buffer.
    pub(crate) fn read(&mut self, length: u64) -> ExifResult<EndianAwareReader> {
        let range = checked_range(self.offset, length, self.data.len())?;
        self.offset += length;
        Ok(EndianAwareReader::new(
            self.data.slice(range),
            self.endianness,
        ))
    }

    /// Read a u16 from the cursor, advancing the internal state by 2 bytes.
    pub(crate) fn read_u16(&mut self) -> ExifResult<u16> {
        self.read(2)?.read_u16()
    }

    /// Read a u32 from the cursor, advancing the internal state by 4 bytes.
    pub(crate) fn read_u32(&mut self) -> ExifResult<u32> {
        self.read(4)?.read_u32()
    }

    /// Read four raw bytes without interpreting them.
    pub(crate) fn read_array4(&mut self) -> ExifResult<[u8; 4]> {
        let reader = self.read(4)?;
        let mut out = [0; 4];
        out.copy_from_slice(reader.as_ref());
        Ok(out)
    }
}

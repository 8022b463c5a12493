use std::collections::HashSet;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::error::{DirectoryError, ExifError, ExifResult, HeaderError};
use crate::ifd::{Entry, GroupKind, TagGroup};
use crate::metadata::cursor::{checked_range, MetadataCursor};
use crate::metadata::value::decode_value;
use crate::reader::Endianness;
use crate::tiff::tags::Type;

/// The size of the TIFF header: byte order, magic number and first IFD offset.
pub const TIFF_HEADER_SIZE: usize = 8;

/// Default ceiling on the number of entries in one directory.
pub const DEFAULT_MAX_DIRECTORY_ENTRIES: u16 = 100;

/// Tag   2 bytes, Type  2 bytes, Count 4 bytes, Value 4 bytes
const IFD_ENTRY_BYTE_SIZE: u64 = 12;

/// The validated header at the start of a TIFF stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for every multi-byte value in the stream.
    pub endianness: Endianness,
    /// Offset of IFD0, relative to the start of the stream.
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Validate the byte order mark, the magic number and the first IFD offset.
    ///
    /// `stream` must start at the TIFF header, right after `"Exif\0\0"`.
    pub fn parse(stream: &Bytes) -> ExifResult<Self> {
        if stream.len() < TIFF_HEADER_SIZE {
            return Err(HeaderError::Truncated(stream.len()).into());
        }

        // The byte order mark reads the same in either order
        let mark = MetadataCursor::new(stream, Endianness::BigEndian).read_u16()?;
        let endianness = Endianness::from_byte_order_mark(mark)
            .ok_or(HeaderError::InvalidByteOrder(mark))?;

        let mut cursor = MetadataCursor::new_with_offset(stream, endianness, 2);

        let magic = cursor.read_u16()?;
        if magic != 42 {
            return Err(HeaderError::InvalidMagic(magic).into());
        }

        let first_ifd_offset = cursor.read_u32()?;
        if (first_ifd_offset as usize) < TIFF_HEADER_SIZE {
            return Err(HeaderError::FirstIfdOffsetTooSmall(first_ifd_offset).into());
        }

        Ok(Self {
            endianness,
            first_ifd_offset,
        })
    }
}

/// A raw 12 byte directory entry whose value has not been decoded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Offset of this entry in the TIFF stream.
    pub offset: u64,
    /// The tag number.
    pub tag: u16,
    /// The raw field type code.
    pub type_code: u16,
    /// Number of elements of the field type.
    pub count: u32,
    /// The value itself if it fits in 4 bytes, otherwise the offset of the value.
    pub value_field: [u8; 4],
}

impl DirectoryEntry {
    /// The field type, if the type code is one this crate decodes.
    pub fn field_type(&self) -> Option<Type> {
        Type::try_from(self.type_code).ok()
    }

    /// Total size of the value in bytes, if the type is known.
    pub fn byte_len(&self) -> Option<u64> {
        self.field_type()
            .map(|ty| self.count as u64 * ty.byte_len() as u64)
    }

    /// Offset of the 4-byte value field within the TIFF stream, `None` on overflow.
    pub(crate) fn value_field_offset(&self) -> Option<u64> {
        self.offset.checked_add(8)
    }
}

/// Reads the entries of a single image file directory.
///
/// Note that you must call [`finish`][ImageFileDirectoryReader::finish] to read the offset of the
/// following IFD.
#[derive(Debug)]
pub struct ImageFileDirectoryReader {
    endianness: Endianness,
    /// The byte offset of the beginning of this IFD
    ifd_start_offset: u64,
    /// The number of entries in this IFD
    entry_count: u16,
}

impl ImageFileDirectoryReader {
    /// Open the IFD starting at the given offset of the TIFF stream.
    ///
    /// Fails if the entry count exceeds `max_entries` or if the directory, including the trailing
    /// next-IFD offset, does not fit in the stream.
    pub fn open(
        stream: &Bytes,
        ifd_start_offset: u64,
        endianness: Endianness,
        max_entries: u16,
    ) -> ExifResult<Self> {
        let mut cursor = MetadataCursor::new_with_offset(stream, endianness, ifd_start_offset);
        let entry_count = cursor.read_u16()?;
        if entry_count > max_entries {
            return Err(DirectoryError::TooManyEntries {
                offset: ifd_start_offset,
                count: entry_count,
                limit: max_entries,
            }
            .into());
        }

        let directory_len = 2 + IFD_ENTRY_BYTE_SIZE * entry_count as u64 + 4;
        checked_range(ifd_start_offset, directory_len, stream.len())?;

        Ok(Self {
            endianness,
            ifd_start_offset,
            entry_count,
        })
    }

    /// The number of entries in this IFD.
    pub fn entry_count(&self) -> u16 {
        self.entry_count
    }

    /// Read the raw entry with the specified index.
    ///
    /// An index at or past the entry count fails with [`DirectoryError::OutOfBounds`].
    pub fn read_entry(&self, stream: &Bytes, entry_idx: u16) -> ExifResult<DirectoryEntry> {
        let offset = self.ifd_start_offset + 2 + IFD_ENTRY_BYTE_SIZE * entry_idx as u64;
        if entry_idx >= self.entry_count {
            return Err(DirectoryError::OutOfBounds {
                offset,
                length: IFD_ENTRY_BYTE_SIZE,
                buffer_len: stream.len() as u64,
            }
            .into());
        }
        let mut cursor = MetadataCursor::new_with_offset(stream, self.endianness, offset);

        let tag = cursor.read_u16()?;
        let type_code = cursor.read_u16()?;
        let count = cursor.read_u32()?;
        let value_field = cursor.read_array4()?;

        Ok(DirectoryEntry {
            offset,
            tag,
            type_code,
            count,
            value_field,
        })
    }

    /// Read all raw entries out of this IFD, in directory order.
    pub fn read_entries(&self, stream: &Bytes) -> ExifResult<Vec<DirectoryEntry>> {
        (0..self.entry_count)
            .map(|idx| self.read_entry(stream, idx))
            .collect()
    }

    /// Finish this reader, reading the byte offset of the next IFD
    pub fn finish(self, stream: &Bytes) -> ExifResult<Option<u64>> {
        let mut cursor =
            MetadataCursor::new_with_offset(stream, self.endianness, self.ifd_start_offset);
        cursor.advance(2 + IFD_ENTRY_BYTE_SIZE * self.entry_count as u64);
        let next_ifd_offset = cursor.read_u32()?;

        // If the ifd_offset is 0, no more IFDs
        if next_ifd_offset == 0 {
            Ok(None)
        } else {
            Ok(Some(next_ifd_offset.into()))
        }
    }
}

/// Read the raw entries of the IFD at `ifd_offset`.
pub fn read_entries(
    stream: &Bytes,
    ifd_offset: u64,
    endianness: Endianness,
    max_entries: u16,
) -> ExifResult<Vec<DirectoryEntry>> {
    ImageFileDirectoryReader::open(stream, ifd_offset, endianness, max_entries)?
        .read_entries(stream)
}

/// Iterator over the offsets of the top-level IFDs linked from `start_offset`.
///
/// A link pointing past the end of the stream ends the chain. A link back to an IFD already
/// visited yields [`DirectoryError::CycleInOffsets`], after which the iterator is exhausted.
#[derive(Debug)]
pub struct IfdChain<'a> {
    stream: &'a Bytes,
    endianness: Endianness,
    max_entries: u16,
    next_ifd_offset: Option<u64>,
    visited: HashSet<u64>,
}

impl Iterator for IfdChain<'_> {
    type Item = ExifResult<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next_ifd_offset.take()?;
        if offset >= self.stream.len() as u64 {
            debug!(offset, "IFD link points past the end of the stream, ending chain");
            return None;
        }
        if !self.visited.insert(offset) {
            return Some(Err(DirectoryError::CycleInOffsets(offset).into()));
        }

        let next = ImageFileDirectoryReader::open(
            self.stream,
            offset,
            self.endianness,
            self.max_entries,
        )
        .and_then(|reader| reader.finish(self.stream));

        match next {
            Ok(next) => {
                self.next_ifd_offset = next;
                Some(Ok(offset))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Walk the singly linked list of IFDs starting at `start_offset`.
pub fn walk_ifd_chain(
    stream: &Bytes,
    start_offset: u64,
    endianness: Endianness,
    max_entries: u16,
) -> IfdChain<'_> {
    IfdChain {
        stream,
        endianness,
        max_entries,
        next_ifd_offset: Some(start_offset),
        visited: HashSet::new(),
    }
}

/// Read the IFD at `ifd_offset` and decode every entry into a [`TagGroup`].
///
/// Entries with an unknown field type are skipped with a warning; any other error aborts.
pub(crate) fn read_tag_group(
    stream: &Bytes,
    ifd_offset: u64,
    kind: GroupKind,
    endianness: Endianness,
    max_entries: u16,
    trace_entries: bool,
) -> ExifResult<TagGroup> {
    let raw_entries = read_entries(stream, ifd_offset, endianness, max_entries)?;
    let mut entries = Vec::with_capacity(raw_entries.len());

    for raw in raw_entries {
        let (field_type, value) = match decode_value(stream, &raw, endianness) {
            Ok(decoded) => decoded,
            Err(ExifError::UnsupportedValueType { tag, type_code }) => {
                warn!(
                    group = kind.as_str(),
                    tag, type_code, "skipping entry with unsupported value type"
                );
                continue;
            }
            Err(err) => return Err(err),
        };
        if trace_entries {
            trace!(
                group = kind.as_str(),
                tag = raw.tag,
                ?field_type,
                count = raw.count,
                %value,
                "decoded entry"
            );
        }
        entries.push(Entry {
            tag: raw.tag,
            field_type,
            count: raw.count,
            value,
        });
    }

    debug!(
        group = kind.as_str(),
        ifd_offset,
        entries = entries.len(),
        "read tag group"
    );
    Ok(TagGroup::new(kind, Some(ifd_offset), entries))
}

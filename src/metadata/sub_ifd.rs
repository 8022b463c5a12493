use bytes::Bytes;
use tracing::debug;

use crate::error::{DirectoryError, ExifResult};
use crate::ifd::{Entry, GroupKind, TagGroup};
use crate::metadata::reader::read_tag_group;
use crate::reader::Endianness;
use crate::tiff::tags::{EXIF_IFD_POINTER, GPS_IFD_POINTER};

/// The groups produced by resolving the sub-IFD pointers of IFD0.
#[derive(Debug)]
pub(crate) struct SubDirectories {
    /// IFD0 with the pointer entries removed.
    pub tiff: TagGroup,
    pub exif: TagGroup,
    pub gps: TagGroup,
}

/// Take the Exif and GPS pointer entries out of IFD0 and decode the directories they point to.
pub(crate) fn resolve_sub_directories(
    stream: &Bytes,
    ifd0: TagGroup,
    endianness: Endianness,
    max_entries: u16,
    trace_entries: bool,
) -> ExifResult<SubDirectories> {
    let ifd0_offset = ifd0.ifd_offset();
    let mut exif_pointer = None;
    let mut gps_pointer = None;
    let mut entries = Vec::with_capacity(ifd0.len());

    for entry in ifd0.entries() {
        match entry.tag {
            // A repeated pointer tag is dropped; the first one wins
            EXIF_IFD_POINTER => {
                let offset = pointer(entry)?;
                exif_pointer.get_or_insert(offset);
            }
            GPS_IFD_POINTER => {
                let offset = pointer(entry)?;
                gps_pointer.get_or_insert(offset);
            }
            _ => entries.push(entry.clone()),
        }
    }

    let read_group = |offset: Option<u64>, kind: GroupKind| match offset {
        Some(offset) => {
            debug!(group = kind.as_str(), offset, "following sub-IFD pointer");
            read_tag_group(stream, offset, kind, endianness, max_entries, trace_entries)
        }
        None => Ok(TagGroup::empty(kind)),
    };

    Ok(SubDirectories {
        tiff: TagGroup::new(GroupKind::Tiff, ifd0_offset, entries),
        exif: read_group(exif_pointer, GroupKind::Exif)?,
        gps: read_group(gps_pointer, GroupKind::Gps)?,
    })
}

fn pointer(entry: &Entry) -> ExifResult<u64> {
    entry
        .value
        .single_unsigned()
        .map(u64::from)
        .ok_or_else(|| DirectoryError::InvalidPointer(entry.tag).into())
}

//! Locating the embedded thumbnail image.

use bytes::Bytes;
use num_enum::TryFromPrimitive;
use tracing::{debug, warn};

use crate::error::{ExifError, ExifResult};
use crate::ifd::TagGroup;
use crate::metadata::cursor::checked_range;
use crate::tiff::tags::{
    COMPRESSION, JPEG_IF_BYTE_COUNT, JPEG_IF_OFFSET, STRIP_BYTE_COUNTS, STRIP_OFFSETS,
};

/// Compression codes of the thumbnail directory that locate a blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
enum ThumbnailCompression {
    /// Uncompressed strips.
    Uncompressed = 1,
    /// Old-style JPEG interchange format.
    Jpeg = 6,
}

/// The format of a [`ThumbnailBlob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// A JPEG image, from compression 6.
    Jpeg,
    /// Uncompressed TIFF strip data, from compression 1.
    Tiff,
}

impl MediaType {
    /// The MIME type of this media type.
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Tiff => "image/tiff",
        }
    }
}

/// The thumbnail image embedded in the thumbnail directory.
///
/// This is a view into the buffer passed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailBlob {
    pub(crate) offset: usize,
    pub(crate) length: usize,
    pub(crate) media_type: MediaType,
    pub(crate) data: Bytes,
}

impl ThumbnailBlob {
    /// The offset of the blob within the buffer passed to the decoder.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The length of the blob in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the blob has no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The format of the blob.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Access the bytes of the blob.
    ///
    /// Note that [`Bytes`] is reference-counted, so it is very cheap to clone if needed.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Copy the blob into an owned buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

/// Locate the thumbnail described by the thumbnail directory.
///
/// `buffer` is the buffer passed to the decoder, with the TIFF stream starting at `tiff_start`.
/// Returns `Ok(None)` for compression codes that do not locate a blob.
///
/// Only the first element of the offset and byte count tags is used, so an uncompressed
/// thumbnail split over several strips yields the first strip only.
pub(crate) fn extract_thumbnail(
    buffer: &Bytes,
    tiff_start: usize,
    thumbnail: &TagGroup,
) -> ExifResult<Option<ThumbnailBlob>> {
    let compression = thumbnail
        .value(COMPRESSION)
        .and_then(|value| value.unsigned(0))
        .ok_or(ExifError::MissingCompressionTag)?;

    let (offset_tag, length_tag, media_type) = match ThumbnailCompression::try_from(compression) {
        Ok(ThumbnailCompression::Uncompressed) => {
            (STRIP_OFFSETS, STRIP_BYTE_COUNTS, MediaType::Tiff)
        }
        Ok(ThumbnailCompression::Jpeg) => {
            (JPEG_IF_OFFSET, JPEG_IF_BYTE_COUNT, MediaType::Jpeg)
        }
        Err(_) => {
            warn!(
                compression,
                "unsupported thumbnail compression, no blob extracted"
            );
            return Ok(None);
        }
    };

    let location = |tag| thumbnail.value(tag).and_then(|value| value.unsigned(0));
    let (Some(offset), Some(length)) = (location(offset_tag), location(length_tag)) else {
        return Err(ExifError::MissingThumbnailLocation { compression });
    };

    let start = tiff_start as u64 + offset as u64;
    let range = checked_range(start, length.into(), buffer.len())?;
    debug!(
        offset = range.start,
        length,
        mime = media_type.mime(),
        "located thumbnail"
    );

    Ok(Some(ThumbnailBlob {
        offset: range.start,
        length: range.len(),
        media_type,
        data: buffer.slice(range),
    }))
}

//! Error handling.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
///
/// Structural errors ([`MalformedHeader`][Self::MalformedHeader],
/// [`CorruptDirectory`][Self::CorruptDirectory]) abort a decode. Thumbnail errors are reported
/// through [`Exif::thumbnail_blob`][crate::Exif::thumbnail_blob] and leave the tag groups intact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExifError {
    /// The input does not start with the JPEG start-of-image marker.
    #[error("Not a JPEG stream: missing start-of-image marker")]
    NotAJpeg,

    /// The TIFF header at the start of the Exif payload is invalid.
    #[error("Malformed TIFF header: {0}")]
    MalformedHeader(#[from] HeaderError),

    /// An image file directory is inconsistent with the buffer it lives in.
    #[error("Corrupt image file directory: {0}")]
    CorruptDirectory(#[from] DirectoryError),

    /// A directory entry declares a value type outside the TIFF/Exif set.
    #[error("Unsupported value type {type_code} for tag 0x{tag:04X}")]
    UnsupportedValueType {
        /// The tag of the offending entry.
        tag: u16,
        /// The raw type code.
        type_code: u16,
    },

    /// The thumbnail directory has no Compression (0x0103) tag.
    #[error("Thumbnail directory has no Compression tag")]
    MissingCompressionTag,

    /// The thumbnail directory lacks the offset or byte count tag for its compression.
    #[error("Thumbnail directory with compression {compression} has no offset or byte count tag")]
    MissingThumbnailLocation {
        /// The compression code found in the thumbnail directory.
        compression: u32,
    },

    /// Two entries of one tag group share a tag name.
    #[error("Duplicate tag name {0}")]
    DuplicateTagName(String),

    /// IO Error.
    #[error("I/O error: {0}")]
    Io(std::io::ErrorKind),
}

impl From<std::io::Error> for ExifError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Reasons for [`ExifError::MalformedHeader`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderError {
    /// The APP1 payload does not start with `"Exif\0\0"`.
    #[error("missing \"Exif\\0\\0\" marker")]
    MissingExifMarker,

    /// Fewer than the 8 bytes of a TIFF header are available.
    #[error("expected 8 header bytes, got {0}")]
    Truncated(usize),

    /// The byte order mark is neither `II` nor `MM`.
    #[error("expected byte order 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// The magic number is not 42.
    #[error("expected magic number 42, got {0}")]
    InvalidMagic(u16),

    /// The first IFD offset points into the header itself.
    #[error("first IFD offset {0} is smaller than 8")]
    FirstIfdOffsetTooSmall(u32),
}

/// Reasons for [`ExifError::CorruptDirectory`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The entry count exceeds the configured ceiling.
    #[error("directory at offset {offset} has {count} entries, limit is {limit}")]
    TooManyEntries {
        /// Offset of the directory.
        offset: u64,
        /// Declared entry count.
        count: u16,
        /// The configured ceiling.
        limit: u16,
    },

    /// A read would fall outside the buffer.
    #[error("reading {length} bytes at offset {offset} overruns buffer of {buffer_len} bytes")]
    OutOfBounds {
        /// Start of the attempted read, relative to the TIFF start.
        offset: u64,
        /// Number of bytes requested.
        length: u64,
        /// Length of the buffer.
        buffer_len: u64,
    },

    /// The chain of directories links back to a directory already visited.
    #[error("directory chain revisits offset {0}")]
    CycleInOffsets(u64),

    /// A sub-directory pointer tag does not hold a single unsigned integer.
    #[error("pointer tag 0x{0:04X} does not hold a single unsigned offset")]
    InvalidPointer(u16),
}

/// Crate-specific result type.
pub type ExifResult<T> = std::result::Result<T, ExifError>;

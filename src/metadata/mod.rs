//! API for reading the image file directories of a TIFF stream.
//!
//! Most users want [`ExifDecoder`][crate::ExifDecoder], which runs these steps in order. The
//! pieces are exposed for inspecting the raw directory structure:
//!
//! ```
//! use bytes::Bytes;
//! use jpeg_exif::metadata::{read_entries, walk_ifd_chain, TiffHeader};
//!
//! // A little endian stream with one empty IFD
//! let stream = Bytes::from_static(&[b'I', b'I', 42, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
//! let header = TiffHeader::parse(&stream).unwrap();
//!
//! for offset in walk_ifd_chain(&stream, header.first_ifd_offset.into(), header.endianness, 100) {
//!     let entries = read_entries(&stream, offset.unwrap(), header.endianness, 100).unwrap();
//!     assert!(entries.is_empty());
//! }
//! ```
//!
//! All offsets are relative to the start of the TIFF stream, which begins right after the
//! `"Exif\0\0"` marker of the APP1 segment.

pub(crate) mod cursor;
pub(crate) mod reader;
pub(crate) mod sub_ifd;
pub(crate) mod value;

pub use reader::{
    read_entries, walk_ifd_chain, DirectoryEntry, IfdChain, ImageFileDirectoryReader, TiffHeader,
    DEFAULT_MAX_DIRECTORY_ENTRIES, TIFF_HEADER_SIZE,
};
pub use value::decode_value;

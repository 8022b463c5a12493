#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(feature = "tokio")]
pub mod async_reader;
pub mod decoder;
pub mod error;
mod exif;
mod ifd;
pub mod iptc;
pub mod jpeg;
pub mod metadata;
pub mod readable;
pub mod reader;
mod thumbnail;
pub mod tiff;
pub mod xmp;

pub use decoder::{DecodeOptions, ExifDecoder};
pub use error::{ExifError, ExifResult};
pub use exif::Exif;
pub use ifd::{Entry, GroupKind, TagGroup};
pub use thumbnail::{MediaType, ThumbnailBlob};

//! The top-level Exif decoding pipeline.

use bytes::Bytes;
use tracing::debug;

use crate::error::{DirectoryError, ExifResult, HeaderError};
use crate::exif::Exif;
use crate::ifd::{GroupKind, TagGroup};
use crate::jpeg::find_exif_segment;
use crate::metadata::reader::{
    read_tag_group, walk_ifd_chain, TiffHeader, DEFAULT_MAX_DIRECTORY_ENTRIES, TIFF_HEADER_SIZE,
};
use crate::metadata::sub_ifd::resolve_sub_directories;
use crate::thumbnail::extract_thumbnail;

/// The marker that starts an Exif APP1 payload.
pub const EXIF_MARKER: &[u8; 6] = b"Exif\0\0";

/// Options for an [`ExifDecoder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// The maximum number of entries in a single directory, the default is 100. Directories
    /// declaring more fail with [`DirectoryError::TooManyEntries`].
    pub max_directory_entries: u16,
    /// Whether to locate the thumbnail blob, the default is `true`. The thumbnail group is
    /// decoded either way.
    pub extract_thumbnail: bool,
    /// Emit a `trace` event for every decoded entry, the default is `false`.
    pub trace_entries: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_directory_entries: DEFAULT_MAX_DIRECTORY_ENTRIES,
            extract_thumbnail: true,
            trace_entries: false,
        }
    }
}

/// Decodes the TIFF structured Exif payload of a JPEG file.
///
/// ```
/// use jpeg_exif::{DecodeOptions, ExifDecoder};
///
/// let decoder = ExifDecoder::with_options(DecodeOptions {
///     extract_thumbnail: false,
///     ..Default::default()
/// });
/// // A JPEG without an APP1 Exif segment
/// let jpeg = vec![0xFF, 0xD8, 0xFF, 0xD9];
/// assert!(decoder.read_jpeg(jpeg).unwrap().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExifDecoder {
    options: DecodeOptions,
}

impl ExifDecoder {
    /// A decoder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder with the given options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// The options of this decoder.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the first Exif APP1 segment of a whole JPEG file.
    ///
    /// Returns `Ok(None)` if the file has no Exif segment. Thumbnail offsets are relative to the
    /// start of `data`.
    pub fn read_jpeg(&self, data: impl Into<Bytes>) -> ExifResult<Option<Exif>> {
        let data = data.into();
        let Some(segment) = find_exif_segment(&data)? else {
            debug!("no Exif segment found");
            return Ok(None);
        };
        debug!(start = segment.start, end = segment.end, "found Exif segment");
        let tiff_start = segment.start + EXIF_MARKER.len();
        self.read_tiff(data.slice(..segment.end), tiff_start).map(Some)
    }

    /// Decode an APP1 payload, which must start with `"Exif\0\0"`.
    pub fn read_app1(&self, data: impl Into<Bytes>) -> ExifResult<Exif> {
        let data = data.into();
        if !data.starts_with(EXIF_MARKER) {
            return Err(HeaderError::MissingExifMarker.into());
        }
        self.read_tiff(data, EXIF_MARKER.len())
    }

    /// Decode the TIFF stream starting at `tiff_start` of `data`.
    ///
    /// Structural errors abort the decode. Errors locating the thumbnail are reported by
    /// [`Exif::thumbnail_blob`].
    pub fn read_tiff(&self, data: impl Into<Bytes>, tiff_start: usize) -> ExifResult<Exif> {
        let data = data.into();
        if tiff_start > data.len() {
            return Err(DirectoryError::OutOfBounds {
                offset: tiff_start as u64,
                length: TIFF_HEADER_SIZE as u64,
                buffer_len: data.len() as u64,
            }
            .into());
        }
        let stream = data.slice(tiff_start..);
        let header = TiffHeader::parse(&stream)?;
        let endianness = header.endianness;
        let max_entries = self.options.max_directory_entries;
        let trace_entries = self.options.trace_entries;
        debug!(
            ?endianness,
            first_ifd_offset = header.first_ifd_offset,
            "read TIFF header"
        );

        let mut chain = walk_ifd_chain(
            &stream,
            header.first_ifd_offset.into(),
            endianness,
            max_entries,
        );
        let ifd0_offset = match chain.next() {
            Some(offset) => offset?,
            None => {
                return Err(DirectoryError::OutOfBounds {
                    offset: header.first_ifd_offset.into(),
                    length: 2,
                    buffer_len: stream.len() as u64,
                }
                .into())
            }
        };
        let ifd1_offset = chain.next().transpose()?;

        let ifd0 = read_tag_group(
            &stream,
            ifd0_offset,
            GroupKind::Tiff,
            endianness,
            max_entries,
            trace_entries,
        )?;
        let groups =
            resolve_sub_directories(&stream, ifd0, endianness, max_entries, trace_entries)?;

        let thumbnail = match ifd1_offset {
            Some(offset) => read_tag_group(
                &stream,
                offset,
                GroupKind::Thumbnail,
                endianness,
                max_entries,
                trace_entries,
            )?,
            None => TagGroup::empty(GroupKind::Thumbnail),
        };

        let thumbnail_blob = if ifd1_offset.is_some() && self.options.extract_thumbnail {
            extract_thumbnail(&data, tiff_start, &thumbnail)
        } else {
            Ok(None)
        };
        if let Err(err) = &thumbnail_blob {
            debug!(%err, "thumbnail extraction failed");
        }

        Ok(Exif {
            endianness,
            tiff: groups.tiff,
            exif: groups.exif,
            gps: groups.gps,
            thumbnail,
            thumbnail_blob,
        })
    }
}

//! Scanning the marker segments of a JPEG file.

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

use crate::decoder::EXIF_MARKER;
use crate::error::{ExifError, ExifResult};

/// Start of image.
pub const SOI: u8 = 0xD8;
/// End of image.
pub const EOI: u8 = 0xD9;
/// Start of scan. Entropy-coded data follows, so scanning stops here.
pub const SOS: u8 = 0xDA;
/// Application segment 1: Exif or XMP.
pub const APP1: u8 = 0xE1;
/// Application segment 13: Photoshop image resources, including IPTC.
pub const APP13: u8 = 0xED;

/// A marker segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The marker byte following `0xFF`.
    pub marker: u8,
    /// The payload, excluding the marker and length bytes.
    pub payload: Range<usize>,
}

/// Iterate over the marker segments of `data`, up to the start of scan.
///
/// Fails with [`ExifError::NotAJpeg`] if `data` does not start with the start-of-image marker.
pub fn segments(data: &[u8]) -> ExifResult<Segments<'_>> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(ExifError::NotAJpeg);
    }
    Ok(Segments {
        data,
        position: 2,
        done: false,
    })
}

/// Iterator returned by [`segments`].
#[derive(Debug)]
pub struct Segments<'a> {
    data: &'a [u8],
    position: usize,
    done: bool,
}

impl Segments<'_> {
    fn stop(&mut self) -> Option<Segment> {
        self.done = true;
        None
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.done {
            return None;
        }
        if self.data.get(self.position) != Some(&0xFF) {
            return self.stop();
        }
        // Any number of 0xFF fill bytes may precede the marker
        while self.data.get(self.position) == Some(&0xFF) {
            self.position += 1;
        }
        let Some(&marker) = self.data.get(self.position) else {
            return self.stop();
        };
        self.position += 1;

        match marker {
            SOS | EOI => return self.stop(),
            0x01 | 0xD0..=0xD7 => {
                return Some(Segment {
                    marker,
                    payload: self.position..self.position,
                })
            }
            _ => {}
        }

        let Some(length) = self
            .data
            .get(self.position..self.position + 2)
            .map(|b| BigEndian::read_u16(b) as usize)
        else {
            return self.stop();
        };
        if length < 2 || self.position + length > self.data.len() {
            return self.stop();
        }

        let payload = self.position + 2..self.position + length;
        self.position += length;
        trace!(
            marker,
            start = payload.start,
            len = payload.len(),
            "JPEG segment"
        );
        Some(Segment { marker, payload })
    }
}

/// Find the payload of the first APP1 segment carrying Exif data.
///
/// The range starts at the `"Exif\0\0"` marker. APP1 segments with other payloads, such as XMP,
/// are skipped.
pub fn find_exif_segment(data: &[u8]) -> ExifResult<Option<Range<usize>>> {
    Ok(segments(data)?
        .filter(|segment| segment.marker == APP1)
        .map(|segment| segment.payload)
        .find(|payload| data[payload.clone()].starts_with(EXIF_MARKER)))
}

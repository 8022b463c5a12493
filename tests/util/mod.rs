//! Synthetic TIFF streams and JPEG files.

#![allow(dead_code)]

use jpeg_exif::reader::Endianness;

pub(crate) const EXIF_IFD_POINTER: u16 = 0x8769;
pub(crate) const GPS_IFD_POINTER: u16 = 0x8825;

/// Bytes of a stand-in JPEG thumbnail.
pub(crate) const THUMBNAIL: &[u8] = &[0xFF, 0xD8, 0xFF, 0xDB, 0, 4, 1, 2, 0xFF, 0xD9];

/// The value of a directory entry in a fixture.
#[derive(Debug, Clone)]
pub(crate) enum Field {
    Byte(Vec<u8>),
    Ascii(&'static str),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    Undefined(Vec<u8>),
    SRational(Vec<(i32, i32)>),
    /// Any type code with pre-encoded value bytes.
    Raw {
        type_code: u16,
        count: u32,
        bytes: Vec<u8>,
    },
    /// A LONG holding the offset of the thumbnail bytes, relative to the TIFF start.
    ThumbnailOffset,
    /// A LONG holding the length of the thumbnail bytes.
    ThumbnailLength,
}

fn u16_bytes(value: u16, endianness: Endianness) -> [u8; 2] {
    match endianness {
        Endianness::LittleEndian => value.to_le_bytes(),
        Endianness::BigEndian => value.to_be_bytes(),
    }
}

fn u32_bytes(value: u32, endianness: Endianness) -> [u8; 4] {
    match endianness {
        Endianness::LittleEndian => value.to_le_bytes(),
        Endianness::BigEndian => value.to_be_bytes(),
    }
}

impl Field {
    /// Type code, count and value bytes.
    fn encode(&self, endianness: Endianness, layout: &Layout) -> (u16, u32, Vec<u8>) {
        let u32s = |values: &[u32]| -> Vec<u8> {
            values
                .iter()
                .flat_map(|v| u32_bytes(*v, endianness))
                .collect()
        };
        match self {
            Field::Byte(v) => (1, v.len() as u32, v.clone()),
            Field::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Field::Short(v) => (
                3,
                v.len() as u32,
                v.iter().flat_map(|v| u16_bytes(*v, endianness)).collect(),
            ),
            Field::Long(v) => (4, v.len() as u32, u32s(v)),
            Field::Rational(v) => (
                5,
                v.len() as u32,
                u32s(&v.iter().flat_map(|(n, d)| [*n, *d]).collect::<Vec<_>>()),
            ),
            Field::Undefined(v) => (7, v.len() as u32, v.clone()),
            Field::SRational(v) => (
                10,
                v.len() as u32,
                u32s(
                    &v.iter()
                        .flat_map(|(n, d)| [*n as u32, *d as u32])
                        .collect::<Vec<_>>(),
                ),
            ),
            Field::Raw {
                type_code,
                count,
                bytes,
            } => (*type_code, *count, bytes.clone()),
            Field::ThumbnailOffset => (4, 1, u32s(&[layout.thumbnail])),
            Field::ThumbnailLength => (4, 1, u32s(&[layout.thumbnail_len])),
        }
    }
}

/// A list of `(tag, value)` pairs, written in order.
pub(crate) type Directory = Vec<(u16, Field)>;

/// Offsets of the parts of a fixture, relative to the TIFF start.
#[derive(Debug, Default, Clone, Copy)]
struct Layout {
    ifd0: u32,
    exif: u32,
    gps: u32,
    ifd1: u32,
    thumbnail: u32,
    thumbnail_len: u32,
}

/// A TIFF stream with IFD0, optional Exif and GPS sub-IFDs, an optional IFD1 and optional
/// thumbnail bytes. Pointer entries are appended to IFD0 automatically.
#[derive(Debug, Clone)]
pub(crate) struct TiffFixture {
    pub endianness: Endianness,
    pub ifd0: Directory,
    pub exif: Option<Directory>,
    pub gps: Option<Directory>,
    pub ifd1: Option<Directory>,
    pub thumbnail: Option<Vec<u8>>,
    /// Written to the header instead of the real IFD0 offset.
    pub first_ifd_offset: Option<u32>,
}

impl TiffFixture {
    pub fn new(endianness: Endianness, ifd0: Directory) -> Self {
        Self {
            endianness,
            ifd0,
            exif: None,
            gps: None,
            ifd1: None,
            thumbnail: None,
            first_ifd_offset: None,
        }
    }

    fn ifd0_with_pointers(&self, layout: &Layout) -> Directory {
        let mut ifd0 = self.ifd0.clone();
        if self.exif.is_some() {
            ifd0.push((EXIF_IFD_POINTER, Field::Long(vec![layout.exif])));
        }
        if self.gps.is_some() {
            ifd0.push((GPS_IFD_POINTER, Field::Long(vec![layout.gps])));
        }
        ifd0
    }

    fn directory_size(&self, directory: &Directory) -> u32 {
        let layout = Layout::default();
        let data: u32 = directory
            .iter()
            .map(|(_, field)| field.encode(self.endianness, &layout).2.len() as u32)
            .filter(|len| *len > 4)
            .map(|len| len + len % 2)
            .sum();
        2 + 12 * directory.len() as u32 + 4 + data
    }

    fn layout(&self) -> Layout {
        let mut layout = Layout {
            ifd0: 8,
            ..Default::default()
        };
        layout.exif = layout.ifd0 + self.directory_size(&self.ifd0_with_pointers(&layout));
        layout.gps = layout.exif + self.exif.as_ref().map_or(0, |d| self.directory_size(d));
        layout.ifd1 = layout.gps + self.gps.as_ref().map_or(0, |d| self.directory_size(d));
        layout.thumbnail = layout.ifd1 + self.ifd1.as_ref().map_or(0, |d| self.directory_size(d));
        layout.thumbnail_len = self.thumbnail.as_ref().map_or(0, |t| t.len() as u32);
        layout
    }

    fn write_directory(
        &self,
        buf: &mut Vec<u8>,
        directory: &Directory,
        next: u32,
        layout: &Layout,
    ) {
        let start = buf.len() as u32;
        let mut data_offset = start + 2 + 12 * directory.len() as u32 + 4;
        let mut data = Vec::new();

        buf.extend_from_slice(&u16_bytes(directory.len() as u16, self.endianness));
        for (tag, field) in directory {
            let (type_code, count, bytes) = field.encode(self.endianness, layout);
            buf.extend_from_slice(&u16_bytes(*tag, self.endianness));
            buf.extend_from_slice(&u16_bytes(type_code, self.endianness));
            buf.extend_from_slice(&u32_bytes(count, self.endianness));
            if bytes.len() <= 4 {
                let mut inline = [0; 4];
                inline[..bytes.len()].copy_from_slice(&bytes);
                buf.extend_from_slice(&inline);
            } else {
                buf.extend_from_slice(&u32_bytes(data_offset, self.endianness));
                data.extend_from_slice(&bytes);
                if bytes.len() % 2 == 1 {
                    data.push(0);
                }
                data_offset += bytes.len() as u32 + bytes.len() as u32 % 2;
            }
        }
        buf.extend_from_slice(&u32_bytes(next, self.endianness));
        buf.extend_from_slice(&data);
    }

    /// The TIFF stream, starting at the byte order mark.
    pub fn build(&self) -> Vec<u8> {
        let layout = self.layout();
        let mut buf = match self.endianness {
            Endianness::LittleEndian => b"II".to_vec(),
            Endianness::BigEndian => b"MM".to_vec(),
        };
        buf.extend_from_slice(&u16_bytes(42, self.endianness));
        let first_ifd_offset = self.first_ifd_offset.unwrap_or(layout.ifd0);
        buf.extend_from_slice(&u32_bytes(first_ifd_offset, self.endianness));

        let next = if self.ifd1.is_some() { layout.ifd1 } else { 0 };
        self.write_directory(&mut buf, &self.ifd0_with_pointers(&layout), next, &layout);
        if let Some(exif) = &self.exif {
            assert_eq!(buf.len() as u32, layout.exif);
            self.write_directory(&mut buf, exif, 0, &layout);
        }
        if let Some(gps) = &self.gps {
            assert_eq!(buf.len() as u32, layout.gps);
            self.write_directory(&mut buf, gps, 0, &layout);
        }
        if let Some(ifd1) = &self.ifd1 {
            assert_eq!(buf.len() as u32, layout.ifd1);
            self.write_directory(&mut buf, ifd1, 0, &layout);
        }
        if let Some(thumbnail) = &self.thumbnail {
            assert_eq!(buf.len() as u32, layout.thumbnail);
            buf.extend_from_slice(thumbnail);
        }
        buf
    }

    /// The APP1 payload: `"Exif\0\0"` followed by the TIFF stream.
    pub fn app1(&self) -> Vec<u8> {
        let mut buf = b"Exif\0\0".to_vec();
        buf.extend_from_slice(&self.build());
        buf
    }

    /// A JPEG file carrying this stream in its APP1 segment.
    pub fn jpeg(&self) -> Vec<u8> {
        jpeg_with_segments(&[(0xE1, self.app1())])
    }
}

/// A JPEG file with a JFIF APP0 segment, the given segments, a stub quantization table and a
/// short scan.
pub(crate) fn jpeg_with_segments(segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
    fn segment(buf: &mut Vec<u8>, marker: u8, payload: &[u8]) {
        buf.extend_from_slice(&[0xFF, marker]);
        buf.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
        buf.extend_from_slice(payload);
    }

    let mut buf = vec![0xFF, 0xD8];
    segment(
        &mut buf,
        0xE0,
        &[b'J', b'F', b'I', b'F', 0, 1, 1, 0, 0, 1, 0, 1, 0, 0],
    );
    for (marker, payload) in segments {
        segment(&mut buf, *marker, payload);
    }
    segment(&mut buf, 0xDB, &[0; 65]);
    segment(&mut buf, 0xDA, &[1, 1, 0, 0, 0x3F, 0]);
    buf.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
    buf.extend_from_slice(&[0xFF, 0xD9]);
    buf
}

/// IFD0 of the camera fixture, without pointer entries.
pub(crate) fn camera_ifd0() -> Directory {
    vec![
        (0x010E, Field::Ascii("A sample image")),
        (0x010F, Field::Ascii("Canon")),
        (0x0110, Field::Ascii("Canon EOS 40D")),
        (0x0112, Field::Short(vec![1])),
        (0x011A, Field::Rational(vec![(300, 1)])),
        (0x011B, Field::Rational(vec![(300, 1)])),
        (0x0128, Field::Short(vec![2])),
        (0x0131, Field::Ascii("GIMP 2.4.5")),
        (0x0132, Field::Ascii("2008:07:31 10:38:11")),
        (0x0213, Field::Short(vec![2])),
    ]
}

/// The Exif sub-IFD of the camera fixture.
pub(crate) fn camera_exif() -> Directory {
    vec![
        (0x829A, Field::Rational(vec![(1, 160)])),
        (0x829D, Field::Rational(vec![(71, 10)])),
        (0x8822, Field::Short(vec![1])),
        (0x8827, Field::Short(vec![100])),
        (0x9000, Field::Undefined(b"0221".to_vec())),
        (0x9003, Field::Ascii("2008:05:30 15:56:01")),
        (0x9004, Field::Ascii("2008:05:30 15:56:01")),
        (0x9101, Field::Undefined(vec![1, 2, 3, 0])),
        (0x9201, Field::SRational(vec![(483328, 65536)])),
        (0x9202, Field::Rational(vec![(368640, 65536)])),
        (0x9204, Field::SRational(vec![(0, 1)])),
        (0x9207, Field::Short(vec![5])),
        (0x9209, Field::Short(vec![9])),
        (0x920A, Field::Rational(vec![(135, 1)])),
        (0x9286, Field::Undefined(vec![0; 12])),
        (0x9290, Field::Ascii("00")),
        (0x9291, Field::Ascii("00")),
        (0x9292, Field::Ascii("00")),
        (0xA000, Field::Undefined(b"0100".to_vec())),
        (0xA001, Field::Short(vec![1])),
        (0xA002, Field::Short(vec![100])),
        (0xA003, Field::Short(vec![68])),
        (0xA20E, Field::Rational(vec![(3888000, 876)])),
        (0xA401, Field::Short(vec![0])),
        (0xA402, Field::Short(vec![1])),
    ]
}

/// The GPS sub-IFD of the camera fixture: 51°30'26" N, 0°7'39" W.
pub(crate) fn camera_gps() -> Directory {
    vec![
        (0x0000, Field::Byte(vec![2, 2, 0, 0])),
        (0x0001, Field::Ascii("N")),
        (0x0002, Field::Rational(vec![(51, 1), (30, 1), (26, 1)])),
        (0x0003, Field::Ascii("W")),
        (0x0004, Field::Rational(vec![(0, 1), (7, 1), (39, 1)])),
        (0x0005, Field::Byte(vec![0])),
        (0x0006, Field::Rational(vec![(35, 1)])),
    ]
}

/// IFD1 of the camera fixture, locating a JPEG thumbnail.
pub(crate) fn camera_ifd1() -> Directory {
    vec![
        (0x0103, Field::Short(vec![6])),
        (0x011A, Field::Rational(vec![(72, 1)])),
        (0x0201, Field::ThumbnailOffset),
        (0x0202, Field::ThumbnailLength),
    ]
}

/// The full camera fixture: IFD0, Exif, GPS, IFD1 and a JPEG thumbnail.
pub(crate) fn camera(endianness: Endianness) -> TiffFixture {
    TiffFixture {
        exif: Some(camera_exif()),
        gps: Some(camera_gps()),
        ifd1: Some(camera_ifd1()),
        thumbnail: Some(THUMBNAIL.to_vec()),
        ..TiffFixture::new(endianness, camera_ifd0())
    }
}

use crate::error::{ExifError, ExifResult};
use crate::ifd::{GroupKind, TagGroup};
use crate::readable::{clock_time, dotted_version, version_string, Flash};
use crate::reader::Endianness;
use crate::thumbnail::ThumbnailBlob;
use crate::tiff::tags::{
    EXIF_VERSION, FLASH, FLASHPIX_VERSION, GPS_LATITUDE, GPS_LATITUDE_REF, GPS_LONGITUDE,
    GPS_LONGITUDE_REF, GPS_TIME_STAMP, GPS_VERSION_ID,
};

/// The metadata decoded from one Exif payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Exif {
    pub(crate) endianness: Endianness,
    pub(crate) tiff: TagGroup,
    pub(crate) exif: TagGroup,
    pub(crate) gps: TagGroup,
    pub(crate) thumbnail: TagGroup,
    pub(crate) thumbnail_blob: ExifResult<Option<ThumbnailBlob>>,
}

impl Exif {
    /// The byte order of the TIFF stream.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// IFD0, without the sub-IFD pointer entries.
    pub fn tiff(&self) -> &TagGroup {
        &self.tiff
    }

    /// The Exif sub-IFD.
    pub fn exif(&self) -> &TagGroup {
        &self.exif
    }

    /// The GPS sub-IFD.
    pub fn gps(&self) -> &TagGroup {
        &self.gps
    }

    /// IFD1.
    pub fn thumbnail(&self) -> &TagGroup {
        &self.thumbnail
    }

    /// The group of the given kind.
    pub fn group(&self, kind: GroupKind) -> &TagGroup {
        match kind {
            GroupKind::Tiff => &self.tiff,
            GroupKind::Exif => &self.exif,
            GroupKind::Gps => &self.gps,
            GroupKind::Thumbnail => &self.thumbnail,
        }
    }

    /// All four groups in the order `tiff`, `exif`, `gps`, `thumbnail`.
    pub fn groups(&self) -> [&TagGroup; 4] {
        GroupKind::ALL.map(|kind| self.group(kind))
    }

    /// The outcome of thumbnail extraction.
    ///
    /// `Ok(None)` means there is no thumbnail directory, its compression does not locate a blob,
    /// or extraction was disabled. An error here does not affect the tag groups.
    pub fn thumbnail_blob(&self) -> Result<Option<&ThumbnailBlob>, &ExifError> {
        self.thumbnail_blob.as_ref().map(Option::as_ref)
    }

    /// Latitude and longitude in signed decimal degrees, south and west negative.
    pub fn gps_coordinates(&self) -> Option<(f64, f64)> {
        let latitude = coordinate(&self.gps, GPS_LATITUDE, GPS_LATITUDE_REF, "S")?;
        let longitude = coordinate(&self.gps, GPS_LONGITUDE, GPS_LONGITUDE_REF, "W")?;
        Some((latitude, longitude))
    }

    /// The Flash tag of the Exif group, split into its bits.
    pub fn flash(&self) -> Option<Flash> {
        let bits = self.exif.value(FLASH)?.unsigned(0)?;
        Some(Flash::from_bits(bits as u16))
    }

    /// ExifVersion as text, e.g. `"0232"`.
    pub fn exif_version(&self) -> Option<String> {
        version_string(self.exif.value(EXIF_VERSION)?)
    }

    /// FlashpixVersion as text, e.g. `"0100"`.
    pub fn flashpix_version(&self) -> Option<String> {
        version_string(self.exif.value(FLASHPIX_VERSION)?)
    }

    /// GPSVersionID joined with dots, e.g. `"2.3.0.0"`.
    pub fn gps_version(&self) -> Option<String> {
        dotted_version(self.gps.value(GPS_VERSION_ID)?)
    }

    /// GPSTimeStamp as `hh:mm:ss` in UTC.
    pub fn gps_time_stamp(&self) -> Option<String> {
        clock_time(self.gps.value(GPS_TIME_STAMP)?)
    }
}

fn coordinate(gps: &TagGroup, tag: u16, ref_tag: u16, negative_ref: &str) -> Option<f64> {
    let value = gps.value(tag)?;
    let degrees = value.rational(0)?.to_f64();
    let minutes = value.rational(1)?.to_f64();
    let seconds = value.rational(2)?.to_f64();
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    match gps.value(ref_tag).and_then(|value| value.as_str()) {
        Some(reference) if reference.trim().eq_ignore_ascii_case(negative_ref) => Some(-decimal),
        _ => Some(decimal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ifd::Entry;
    use crate::tiff::tags::Type;
    use crate::tiff::{Rational, Value};

    fn dms(d: u32, m: u32, s: u32) -> Value {
        Value::Rational(
            [d, m, s]
                .into_iter()
                .map(|numerator| Rational {
                    numerator,
                    denominator: 1,
                })
                .collect(),
        )
    }

    fn entry(tag: u16, value: Value) -> Entry {
        Entry {
            tag,
            field_type: Type::RATIONAL,
            count: value.len() as u32,
            value,
        }
    }

    fn exif_with_gps(entries: Vec<Entry>) -> Exif {
        Exif {
            endianness: Endianness::LittleEndian,
            tiff: TagGroup::empty(GroupKind::Tiff),
            exif: TagGroup::empty(GroupKind::Exif),
            gps: TagGroup::new(GroupKind::Gps, Some(100), entries),
            thumbnail: TagGroup::empty(GroupKind::Thumbnail),
            thumbnail_blob: Ok(None),
        }
    }

    #[test]
    fn test_gps_coordinates() {
        let exif = exif_with_gps(vec![
            entry(GPS_LATITUDE_REF, Value::Ascii("S".into())),
            entry(GPS_LATITUDE, dms(33, 51, 36)),
            entry(GPS_LONGITUDE_REF, Value::Ascii("E".into())),
            entry(GPS_LONGITUDE, dms(151, 12, 0)),
        ]);
        let (latitude, longitude) = exif.gps_coordinates().unwrap();
        assert!((latitude + 33.86).abs() < 1e-9);
        assert!((longitude - 151.2).abs() < 1e-9);
    }

    #[test]
    fn test_gps_coordinates_missing() {
        let exif = exif_with_gps(vec![entry(GPS_LATITUDE, dms(1, 0, 0))]);
        assert_eq!(exif.gps_coordinates(), None);
    }

    #[test]
    fn test_gps_time_stamp() {
        let exif = exif_with_gps(vec![
            entry(GPS_VERSION_ID, Value::Byte(vec![2, 2, 0, 0])),
            entry(GPS_TIME_STAMP, dms(23, 59, 5)),
        ]);
        assert_eq!(exif.gps_time_stamp().as_deref(), Some("23:59:05"));
        assert_eq!(exif.gps_version().as_deref(), Some("2.2.0.0"));
        assert_eq!(exif.flash(), None);
        assert_eq!(exif.exif_version(), None);
    }

    #[test]
    fn test_groups_order() {
        let exif = exif_with_gps(vec![]);
        let kinds = exif.groups().map(|group| group.kind());
        assert_eq!(kinds, GroupKind::ALL);
        assert_eq!(exif.thumbnail_blob(), Ok(None));
    }

    #[test]
    fn test_exif_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Exif>();
    }
}

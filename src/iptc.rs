//! IPTC fields stored in the Photoshop image resources of an APP13 segment.

use byteorder::{BigEndian, ByteOrder};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing::debug;

use crate::error::ExifResult;
use crate::jpeg::{segments, APP13};
use crate::metadata::cursor::checked_range;

/// Image resource block signature followed by the IPTC-NAA resource id 0x0404.
const IPTC_RESOURCE: &[u8; 6] = b"8BIM\x04\x04";

/// Tag marker that starts every IIM dataset.
const IIM_TAG_MARKER: u8 = 0x1C;

/// The application record, which holds the editorial fields.
const APPLICATION_RECORD: u8 = 2;

/// The application record datasets this crate collects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum IptcField {
    /// 2:15
    Category = 0x0F,
    /// 2:25, repeatable
    Keywords = 0x19,
    /// 2:55
    DateCreated = 0x37,
    /// 2:80, the creator
    Byline = 0x50,
    /// 2:85
    BylineTitle = 0x55,
    /// 2:105
    Headline = 0x69,
    /// 2:110
    Credit = 0x6E,
    /// 2:116
    Copyright = 0x74,
    /// 2:120, the caption or abstract
    Caption = 0x78,
    /// 2:122
    CaptionWriter = 0x7A,
}

/// The IPTC fields of a file, in the order they first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IptcData {
    fields: Vec<(IptcField, Vec<String>)>,
}

impl IptcData {
    /// All values of `field`, in file order. Repeatable fields such as keywords may have several.
    pub fn get(&self, field: IptcField) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over the fields and their values.
    pub fn iter(&self) -> impl Iterator<Item = (IptcField, &[String])> {
        self.fields
            .iter()
            .map(|(field, values)| (*field, values.as_slice()))
    }

    /// Returns `true` if no known field was found.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: IptcField, value: String) {
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((field, vec![value])),
        }
    }
}

/// Read the IPTC fields of a JPEG file.
///
/// Returns `Ok(None)` if no APP13 segment carries an IPTC resource.
pub fn read_iptc(data: &[u8]) -> ExifResult<Option<IptcData>> {
    for segment in segments(data)?.filter(|segment| segment.marker == APP13) {
        let payload = &data[segment.payload.clone()];
        let Some(position) = payload
            .windows(IPTC_RESOURCE.len())
            .position(|window| window == IPTC_RESOURCE)
        else {
            continue;
        };
        debug!(
            offset = segment.payload.start + position,
            "found IPTC resource"
        );
        let block = read_resource(&payload[position..])?;
        return Ok(Some(read_datasets(block)));
    }
    Ok(None)
}

/// The data of the image resource block at the start of `resource`.
fn read_resource(resource: &[u8]) -> ExifResult<&[u8]> {
    // The Pascal string name, padded to an even length including its length byte
    let name_len = *resource.get(6).unwrap_or(&0) as u64;
    let name_size = (1 + name_len + 1) & !1;
    let size_offset = 6 + name_size;

    let size_range = checked_range(size_offset, 4, resource.len())?;
    let size = BigEndian::read_u32(&resource[size_range]);

    let data_range = checked_range(size_offset + 4, size.into(), resource.len())?;
    Ok(&resource[data_range])
}

fn read_datasets(block: &[u8]) -> IptcData {
    let mut iptc = IptcData::default();
    let mut position = 0;

    while let Some(header) = block.get(position..position + 5) {
        if header[0] != IIM_TAG_MARKER {
            position += 1;
            continue;
        }
        let record = header[1];
        let dataset = header[2];
        let size = BigEndian::read_u16(&header[3..5]) as usize;
        let Some(value) = block.get(position + 5..position + 5 + size) else {
            break;
        };

        if record == APPLICATION_RECORD {
            if let Ok(field) = IptcField::try_from(dataset) {
                iptc.push(field, String::from_utf8_lossy(value).into_owned());
            }
        }
        position += 5 + size;
    }
    iptc
}

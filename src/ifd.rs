//! Decoded tag groups.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ExifError, ExifResult};
use crate::tiff::tags::{tag_name, Type};
use crate::tiff::Value;

/// Which directory a [`TagGroup`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// IFD0, the primary image directory.
    Tiff,
    /// The Exif sub-IFD linked from IFD0 via tag 0x8769.
    Exif,
    /// The GPS sub-IFD linked from IFD0 via tag 0x8825.
    Gps,
    /// IFD1, the thumbnail directory.
    Thumbnail,
}

impl GroupKind {
    /// All group kinds, in the order they are reported.
    pub const ALL: [GroupKind; 4] = [
        GroupKind::Tiff,
        GroupKind::Exif,
        GroupKind::Gps,
        GroupKind::Thumbnail,
    ];

    /// A short lowercase name, used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Tiff => "tiff",
            GroupKind::Exif => "exif",
            GroupKind::Gps => "gps",
            GroupKind::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single decoded directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The tag number.
    pub tag: u16,
    /// The declared field type.
    pub field_type: Type,
    /// The declared element count.
    pub count: u32,
    /// The decoded value.
    pub value: Value,
}

/// The decoded entries of one directory, in directory order.
///
/// A group whose directory is absent is empty and has no offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    kind: GroupKind,
    ifd_offset: Option<u64>,
    entries: Vec<Entry>,
}

impl TagGroup {
    pub(crate) fn new(kind: GroupKind, ifd_offset: Option<u64>, entries: Vec<Entry>) -> Self {
        Self {
            kind,
            ifd_offset,
            entries,
        }
    }

    pub(crate) fn empty(kind: GroupKind) -> Self {
        Self::new(kind, None, vec![])
    }

    /// Which directory this group was read from.
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Offset of the directory relative to the TIFF start, or `None` if it was absent.
    pub fn ifd_offset(&self) -> Option<u64> {
        self.ifd_offset
    }

    /// The entries in directory order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The first entry with the given tag.
    pub fn get(&self, tag: u16) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// The value of the first entry with the given tag.
    pub fn value(&self, tag: u16) -> Option<&Value> {
        self.get(tag).map(|entry| &entry.value)
    }

    /// The name of `tag` in this group's tag table.
    pub fn tag_name(&self, tag: u16) -> Option<&'static str> {
        tag_name(self.kind, tag)
    }

    /// The entries keyed by tag name.
    ///
    /// Tags missing from the table are named `UnknownTag_0x` followed by four hex digits. Two
    /// entries with the same name fail with [`ExifError::DuplicateTagName`].
    pub fn by_name(&self) -> ExifResult<BTreeMap<String, &Entry>> {
        let mut map = BTreeMap::new();
        for entry in &self.entries {
            let name = match self.tag_name(entry.tag) {
                Some(name) => name.to_string(),
                None => format!("UnknownTag_0x{:04x}", entry.tag),
            };
            if map.contains_key(&name) {
                return Err(ExifError::DuplicateTagName(name));
            }
            map.insert(name, entry);
        }
        Ok(map)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the group has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in directory order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a TagGroup {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

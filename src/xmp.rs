//! Extracting the RDF body of the XMP packet.

use tracing::debug;

use crate::error::{ExifError, ExifResult};
use crate::jpeg::SOI;

/// The id of every XMP packet wrapper.
const XPACKET_ID: &[u8] = b"W5M0MpCehiHzreSzNTczkc9d";

const RDF_START: &[u8] = b"<rdf:RDF ";
const RDF_END: &[u8] = b"</rdf:RDF>";

/// Namespace declarations that some writers use without declaring them.
const EXTRA_NAMESPACES: &[(&str, &str)] = &[
    ("Iptc4xmpCore", "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("tiff", "http://ns.adobe.com/tiff/1.0/"),
    ("plus", "http://schemas.android.com/apk/lib/com.google.android.gms.plus"),
    ("ext", "http://www.gettyimages.com/xsltExtension/1.0"),
    ("exif", "http://ns.adobe.com/exif/1.0/"),
    ("stEvt", "http://ns.adobe.com/xap/1.0/sType/ResourceEvent#"),
    ("stRef", "http://ns.adobe.com/xap/1.0/sType/ResourceRef#"),
    ("crs", "http://ns.adobe.com/camera-raw-settings/1.0/"),
    ("xapGImg", "http://ns.adobe.com/xap/1.0/g/img/"),
    ("Iptc4xmpExt", "http://iptc.org/std/Iptc4xmpExt/2008-02-29/"),
];

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Read the `rdf:RDF` element of the XMP packet of a JPEG file.
///
/// With `fix_namespaces`, common namespace declarations are added to the opening tag so the
/// result parses as standalone XML. Returns `Ok(None)` if there is no packet or it has no RDF
/// element.
pub fn read_xmp(data: &[u8], fix_namespaces: bool) -> ExifResult<Option<String>> {
    if !data.starts_with(&[0xFF, SOI]) {
        return Err(ExifError::NotAJpeg);
    }
    let Some(packet) = find(data, XPACKET_ID) else {
        return Ok(None);
    };
    let packet = &data[packet..];
    let Some(start) = find(packet, RDF_START) else {
        return Ok(None);
    };
    let Some(len) = find(&packet[start..], RDF_END) else {
        return Ok(None);
    };
    let rdf = &packet[start..start + len + RDF_END.len()];
    debug!(len = rdf.len(), "found XMP packet");

    let rdf = String::from_utf8_lossy(rdf);
    if !fix_namespaces {
        return Ok(Some(rdf.into_owned()));
    }

    let mut fixed = String::with_capacity(rdf.len() + 1024);
    fixed.push_str("<rdf:RDF ");
    for (prefix, uri) in EXTRA_NAMESPACES {
        fixed.push_str(&format!("xmlns:{prefix}=\"{uri}\" "));
    }
    fixed.push_str(&rdf[RDF_START.len()..]);
    Ok(Some(fixed))
}

//! Reading Exif metadata from asynchronous sources.
//!
//! The decoder itself is synchronous. These helpers read the whole input into memory and then
//! decode it, so the only suspension point is the read.

use std::path::Path;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::decoder::ExifDecoder;
use crate::error::ExifResult;
use crate::exif::Exif;

/// Read a JPEG file from an [`AsyncRead`] and decode its Exif metadata.
///
/// Returns `Ok(None)` if the file has no Exif segment.
pub async fn read_exif_async<R: AsyncRead + Unpin>(
    mut reader: R,
    decoder: &ExifDecoder,
) -> ExifResult<Option<Exif>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    debug!(len = buf.len(), "read JPEG from async reader");
    decoder.read_jpeg(Bytes::from(buf))
}

/// Read the JPEG file at `path` and decode its Exif metadata.
///
/// Returns `Ok(None)` if the file has no Exif segment.
pub async fn read_exif_file(
    path: impl AsRef<Path>,
    decoder: &ExifDecoder,
) -> ExifResult<Option<Exif>> {
    let path = path.as_ref();
    let buf = tokio::fs::read(path).await?;
    debug!(path = %path.display(), len = buf.len(), "read JPEG file");
    decoder.read_jpeg(Bytes::from(buf))
}

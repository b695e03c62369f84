//! Content-based image format detection.
//!
//! Detection never trusts a file extension: the primary tier matches magic
//! bytes, the secondary tier pattern-matches a caller-declared MIME string
//! for buffers whose signature we cannot place.

use crate::types::{LensError, LensResult};

/// A supported image container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Tiff,
    Bmp,
}

impl ImageKind {
    pub const ALL: [ImageKind; 4] = [
        ImageKind::Jpeg,
        ImageKind::Png,
        ImageKind::Tiff,
        ImageKind::Bmp,
    ];

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Tiff => "image/tiff",
            ImageKind::Bmp => "image/bmp",
        }
    }
}

/// Magic-byte signatures for the supported containers.
const SIGNATURES: &[(&[u8], ImageKind)] = &[
    (b"\xFF\xD8\xFF", ImageKind::Jpeg),
    (b"\x89PNG\r\n\x1a\n", ImageKind::Png),
    (b"II\x2A\x00", ImageKind::Tiff),
    (b"MM\x00\x2A", ImageKind::Tiff),
    (b"BM", ImageKind::Bmp),
];

/// Signatures we recognize but do not decode, kept so `UnsupportedFormat`
/// can name what it saw.
const FOREIGN_SIGNATURES: &[(&[u8], &str)] = &[
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
];

/// Identify a buffer's container format from its leading bytes.
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    SIGNATURES
        .iter()
        .find(|(sig, _)| bytes.starts_with(sig))
        .map(|(_, kind)| *kind)
}

/// Secondary tier: place a declared MIME string onto a supported kind.
fn sniff_mime(mime: &str) -> Option<ImageKind> {
    let mime = mime.trim().to_ascii_lowercase();
    ImageKind::ALL.into_iter().find(|kind| {
        let tag = kind.mime().trim_start_matches("image/");
        mime.contains(tag) || (*kind == ImageKind::Jpeg && mime.contains("jpg"))
    })
}

/// Name the format of an unsupported buffer as best we can.
fn foreign_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    FOREIGN_SIGNATURES
        .iter()
        .find(|(sig, _)| bytes.starts_with(sig))
        .map(|(_, mime)| *mime)
}

/// Determine a buffer's true format, or fail with the closest MIME name we
/// could attach to it.
pub fn detect(bytes: &[u8], declared_mime: Option<&str>) -> LensResult<ImageKind> {
    if let Some(kind) = sniff(bytes) {
        tracing::debug!(mime = kind.mime(), "sniffed image container");
        return Ok(kind);
    }
    if let Some(kind) = declared_mime.and_then(sniff_mime) {
        tracing::debug!(mime = kind.mime(), "matched declared MIME string");
        return Ok(kind);
    }
    let detected = foreign_mime(bytes)
        .or(declared_mime)
        .unwrap_or("application/octet-stream");
    Err(LensError::UnsupportedFormat(detected.to_string()))
}

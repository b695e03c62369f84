//! Image decoders and the dispatcher that routes sniffed buffers to them.
//!
//! Every decoder normalizes to the same canonical layout: `dtype = "uint8"`,
//! `shape = [height, width, 4]`. Sources with fewer channels are expanded by
//! RGBA conversion — luma replicated into R=G=B, alpha set fully opaque — so
//! a renderer only ever sees one channel layout.

use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::sniff::{detect, ImageKind};
use crate::types::{LensError, LensResult, Tensor};

type DecodeFn = fn(&[u8]) -> LensResult<Tensor>;

/// Dispatch table from detected format to decoder.
const DECODERS: &[(ImageKind, DecodeFn)] = &[
    (ImageKind::Jpeg, decode_jpeg),
    (ImageKind::Png, decode_png),
    (ImageKind::Tiff, decode_tiff),
    (ImageKind::Bmp, decode_bmp),
];

/// Sniff a buffer's true format and decode it to a canonical tensor.
pub fn decode_from_memory(bytes: &[u8], declared_mime: Option<&str>) -> LensResult<Tensor> {
    let kind = detect(bytes, declared_mime)?;
    let decoder = DECODERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, f)| *f)
        .ok_or_else(|| LensError::UnsupportedFormat(kind.mime().to_string()))?;
    decoder(bytes)
}

/// Read an image file and decode it. The file name plays no part in format
/// detection.
pub fn decode_from_file(path: &Path) -> LensResult<Tensor> {
    let bytes = std::fs::read(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    decode_from_memory(&bytes, None)
}

fn decode_jpeg(bytes: &[u8]) -> LensResult<Tensor> {
    rgba_tensor(image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?)
}

fn decode_png(bytes: &[u8]) -> LensResult<Tensor> {
    rgba_tensor(image::load_from_memory_with_format(bytes, ImageFormat::Png)?)
}

fn decode_bmp(bytes: &[u8]) -> LensResult<Tensor> {
    rgba_tensor(image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?)
}

/// TIFF containers may carry several image file directories; only the first
/// one is decoded. A container whose directory table is absent or empty has
/// no image at all.
fn decode_tiff(bytes: &[u8]) -> LensResult<Tensor> {
    if !tiff_has_directory(bytes) {
        return Err(LensError::NoImageFound);
    }
    rgba_tensor(image::load_from_memory_with_format(bytes, ImageFormat::Tiff)?)
}

/// Walk the TIFF header to the first IFD and check it holds at least one
/// entry. Byte order comes from the header's `II`/`MM` marker.
fn tiff_has_directory(bytes: &[u8]) -> bool {
    if bytes.len() < 8 {
        return false;
    }
    let little_endian = match &bytes[0..2] {
        b"II" => true,
        b"MM" => false,
        _ => return false,
    };
    let read_u16 = |b: [u8; 2]| {
        if little_endian {
            u16::from_le_bytes(b)
        } else {
            u16::from_be_bytes(b)
        }
    };
    let read_u32 = |b: [u8; 4]| {
        if little_endian {
            u32::from_le_bytes(b)
        } else {
            u32::from_be_bytes(b)
        }
    };
    let offset = read_u32([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    if offset == 0 || offset + 2 > bytes.len() {
        return false;
    }
    read_u16([bytes[offset], bytes[offset + 1]]) > 0
}

/// Expand any decoded image into the canonical 4-channel byte layout.
fn rgba_tensor(img: DynamicImage) -> LensResult<Tensor> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Tensor::from_parts(
        rgba.into_raw(),
        vec![height as usize, width as usize, 4],
        "uint8",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn png_decodes_to_four_channels() {
        let bytes = encode(&DynamicImage::new_rgb8(10, 10), ImageFormat::Png);
        let t = decode_from_memory(&bytes, None).unwrap();
        assert_eq!(t.shape(), &[10, 10, 4]);
        assert_eq!(t.dtype(), "uint8");
        assert_eq!(t.data().len(), 10 * 10 * 4);
    }

    #[test]
    fn jpeg_decodes_to_four_channels() {
        let bytes = encode(&DynamicImage::new_rgb8(8, 6), ImageFormat::Jpeg);
        let t = decode_from_memory(&bytes, None).unwrap();
        assert_eq!(t.shape(), &[6, 8, 4]);
        assert_eq!(t.data().len(), 6 * 8 * 4);
    }

    #[test]
    fn bmp_decodes_to_four_channels() {
        let bytes = encode(&DynamicImage::new_rgb8(5, 4), ImageFormat::Bmp);
        let t = decode_from_memory(&bytes, None).unwrap();
        assert_eq!(t.shape(), &[4, 5, 4]);
    }

    #[test]
    fn tiff_decodes_first_directory() {
        let bytes = encode(&DynamicImage::new_rgb8(3, 7), ImageFormat::Tiff);
        let t = decode_from_memory(&bytes, None).unwrap();
        assert_eq!(t.shape(), &[7, 3, 4]);
    }

    #[test]
    fn tiff_without_directories_has_no_image() {
        // Valid signature, first-IFD offset of zero.
        let err = decode_from_memory(b"II\x2A\x00\x00\x00\x00\x00", None).unwrap_err();
        assert!(matches!(err, LensError::NoImageFound));
    }

    #[test]
    fn jpeg_bytes_route_to_jpeg_regardless_of_claimed_type() {
        // A JPEG stream claiming to be PNG must still hit the JPEG decoder.
        let bytes = encode(&DynamicImage::new_rgb8(4, 4), ImageFormat::Jpeg);
        let t = decode_from_memory(&bytes, Some("image/png")).unwrap();
        assert_eq!(t.shape(), &[4, 4, 4]);
    }

    #[test]
    fn grayscale_expands_to_opaque_rgba() {
        let mut img = image::GrayImage::new(2, 2);
        img.put_pixel(0, 0, image::Luma([200]));
        let bytes = encode(&DynamicImage::ImageLuma8(img), ImageFormat::Png);
        let t = decode_from_memory(&bytes, None).unwrap();
        assert_eq!(t.shape(), &[2, 2, 4]);
        // First pixel: luma replicated, alpha opaque.
        assert_eq!(&t.data()[0..4], &[200, 200, 200, 255]);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = decode_from_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, LensError::FileRead { .. }));
    }
}

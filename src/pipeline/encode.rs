//! Image encoding: `DynamicImage` → PNG bytes or a base64 data URI.
//!
//! A rendered formula is often embedded straight into HTML or Markdown.
//! PNG keeps both the alpha channel and the hard glyph edges intact.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded {}x{} image → {} bytes PNG", img.width(), img.height(), buf.len());
    Ok(buf)
}

/// Encode an image as a `data:image/png;base64,…` URI.
pub fn to_data_uri(img: &DynamicImage) -> Result<String, image::ImageError> {
    let b64 = STANDARD.encode(encode_png(img)?);
    Ok(format!("data:image/png;base64,{b64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 128])));
        let bytes = encode_png(&img).expect("encode should succeed");
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(5, 5), &Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn data_uri_is_valid_base64() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let uri = to_data_uri(&img).unwrap();
        let payload = uri
            .strip_prefix("data:image/png;base64,")
            .expect("data URI prefix");
        let decoded = STANDARD.decode(payload).expect("valid base64");
        assert!(!decoded.is_empty());
    }
}

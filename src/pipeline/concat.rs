//! Vertical concatenation of rendered lines.
//!
//! Lines of a multi-line expression come back from the renderer at their
//! natural widths. They are scaled to the narrowest width, keeping each
//! aspect ratio, and stacked top to bottom in input order.

use crate::error::TexPngError;
use crate::pipeline::io;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Pixel, RgbImage};
use std::path::Path;
use tracing::debug;

/// Height of an image of `width`×`height` once scaled to `target_width`.
///
/// Rounds down, but never below one pixel.
fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let h = u64::from(height) * u64::from(target_width) / u64::from(width);
    (h as u32).max(1)
}

/// Resize every image to the minimum width among them and stack vertically.
///
/// Output width is `min(widths)`; output height is the sum of the rescaled
/// heights. All images share one pixel type, so channel counts always agree.
///
/// # Errors
/// * [`TexPngError::EmptyImageSet`] when `images` is empty
/// * [`TexPngError::ZeroSizedImage`] when an input has no pixels
pub fn vconcat_resize_min<P>(
    images: &[ImageBuffer<P, Vec<P::Subpixel>>],
    interpolation: FilterType,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, TexPngError>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    if let Some(index) = images
        .iter()
        .position(|im| im.width() == 0 || im.height() == 0)
    {
        return Err(TexPngError::ZeroSizedImage { index });
    }
    let w_min = images
        .iter()
        .map(|im| im.width())
        .min()
        .ok_or(TexPngError::EmptyImageSet)?;

    let resized: Vec<_> = images
        .iter()
        .map(|im| {
            if im.width() == w_min {
                im.clone()
            } else {
                let h = scaled_height(im.width(), im.height(), w_min);
                imageops::resize(im, w_min, h, interpolation)
            }
        })
        .collect();

    let total_height: u32 = resized.iter().map(|im| im.height()).sum();
    let mut out = ImageBuffer::new(w_min, total_height);
    let mut y = 0i64;
    for im in &resized {
        imageops::replace(&mut out, im, 0, y);
        y += i64::from(im.height());
    }

    debug!(
        "Concatenated {} images → {}x{} px",
        images.len(),
        w_min,
        total_height
    );
    Ok(out)
}

/// Decode `paths` in order, drop their alpha channels, and concatenate them.
///
/// Transparent pixels of the renderer's output become their underlying RGB
/// value (black for a cleared canvas), which
/// [`crate::pipeline::knockout::black_to_transparent`] later undoes.
pub fn vconcat_files(paths: &[&Path], interpolation: FilterType) -> Result<RgbImage, TexPngError> {
    let images = paths
        .iter()
        .map(|p| io::load_image(p).map(|img| img.to_rgb8()))
        .collect::<Result<Vec<_>, _>>()?;
    vconcat_resize_min(&images, interpolation)
}

/// Concatenate the images at `paths` and write the result to `out`.
pub fn vconcat_files_to(
    paths: &[&Path],
    out: &Path,
    interpolation: FilterType,
) -> Result<(u32, u32), TexPngError> {
    let stacked = vconcat_files(paths, interpolation)?;
    let dims = stacked.dimensions();
    io::save_png(&DynamicImage::ImageRgb8(stacked), out)?;
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn empty_set_fails() {
        let images: Vec<RgbImage> = Vec::new();
        let err = vconcat_resize_min(&images, FilterType::CatmullRom).unwrap_err();
        assert!(matches!(err, TexPngError::EmptyImageSet));
    }

    #[test]
    fn zero_sized_input_fails() {
        let images = vec![RgbImage::new(4, 4), RgbImage::new(0, 3)];
        let err = vconcat_resize_min(&images, FilterType::CatmullRom).unwrap_err();
        assert!(matches!(err, TexPngError::ZeroSizedImage { index: 1 }));
    }

    #[test]
    fn width_is_min_and_heights_scale() {
        let images = vec![
            RgbImage::from_pixel(100, 40, Rgb([255, 0, 0])),
            RgbImage::from_pixel(50, 30, Rgb([0, 255, 0])),
            RgbImage::from_pixel(200, 10, Rgb([0, 0, 255])),
        ];
        let out = vconcat_resize_min(&images, FilterType::CatmullRom).unwrap();
        // 40*50/100 = 20, 30 unchanged, 10*50/200 = 2 (rounded down from 2.5)
        assert_eq!(out.dimensions(), (50, 20 + 30 + 2));
    }

    #[test]
    fn order_is_top_to_bottom() {
        let images = vec![
            RgbImage::from_pixel(10, 5, Rgb([255, 0, 0])),
            RgbImage::from_pixel(10, 5, Rgb([0, 0, 255])),
        ];
        let out = vconcat_resize_min(&images, FilterType::Nearest).unwrap();
        assert_eq!(out.get_pixel(3, 0), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(3, 9), &Rgb([0, 0, 255]));
    }

    #[test]
    fn tiny_heights_keep_one_row() {
        let images = vec![
            RgbImage::from_pixel(1000, 1, Rgb([9, 9, 9])),
            RgbImage::from_pixel(10, 10, Rgb([9, 9, 9])),
        ];
        let out = vconcat_resize_min(&images, FilterType::Triangle).unwrap();
        assert_eq!(out.dimensions(), (10, 11));
    }

    #[test]
    fn files_drop_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        RgbaImage::from_pixel(8, 2, Rgba([0, 0, 0, 0])).save(&a).unwrap();
        RgbaImage::from_pixel(8, 3, Rgba([255, 255, 255, 255]))
            .save(&b)
            .unwrap();

        let out = vconcat_files(&[a.as_path(), b.as_path()], FilterType::CatmullRom).unwrap();
        assert_eq!(out.dimensions(), (8, 5));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(0, 4), &Rgb([255, 255, 255]));
    }

    #[test]
    fn unreadable_member_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let err = vconcat_files(&[missing.as_path()], FilterType::CatmullRom).unwrap_err();
        assert!(matches!(err, TexPngError::FileNotFound { .. }));
    }
}

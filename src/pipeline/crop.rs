//! Bounding-box cropping of rendered formulas.
//!
//! ## How the bounds are found
//!
//! The colour image is reduced to BT.601 luminance (the `0.299 R + 0.587 G
//! + 0.114 B` weighting of the usual BGR-to-gray conversion, in 14-bit fixed
//! point) and binarised so that every non-zero pixel becomes foreground.
//! `image`'s own `to_luma8` uses Rec.709 weights, which would classify dim
//! red or blue pixels differently. External contours of that mask are
//! traced with `imageproc`, and their axis-aligned bounding rectangle is
//! cut out of the original colour image. This relies on the background
//! being exactly black, which is why [`crop_transparent`] flattens the
//! alpha channel onto the background colour first.
//!
//! With [`CropMode::FirstContour`] only the first external contour in scan
//! order is kept; a formula made of several disconnected glyphs then loses
//! everything outside that one glyph. [`CropMode::Union`] keeps them all.

use crate::config::CropMode;
use crate::error::TexPngError;
use crate::pipeline::{composite, io};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{threshold, ThresholdType};
use std::path::Path;
use tracing::debug;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    fn from_contour(contour: &Contour<u32>) -> Option<Self> {
        let mut points = contour.points.iter();
        let first = points.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// BT.601 luminance of one RGB pixel, rounded as in 14-bit fixed point.
fn luma_601([r, g, b]: [u8; 3]) -> u8 {
    let y = (u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192) >> 14;
    y.min(255) as u8
}

/// Binary mask of the image: any luminance of 1 or more becomes 255.
fn content_mask(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([luma_601(rgb.get_pixel(x, y).0)])
    });
    threshold(&gray, 0, ThresholdType::Binary)
}

/// Find the content rectangle of a flattened (non-transparent) image.
///
/// Returns `None` when the image is uniformly background.
pub fn content_bounds(img: &DynamicImage, mode: CropMode) -> Option<CropRect> {
    let mask = content_mask(img);
    let mut external = find_contours::<u32>(&mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| CropRect::from_contour(&c));

    let rect = match mode {
        CropMode::FirstContour => external.next(),
        CropMode::Union => external.reduce(CropRect::union),
    }?;
    debug!(
        "Content bounds ({:?}): x={} y={} {}x{}",
        mode, rect.x, rect.y, rect.width, rect.height
    );
    Some(rect)
}

/// Crop a flattened image to its content, dropping any alpha channel.
pub fn crop_to_content(img: &DynamicImage, mode: CropMode) -> Option<RgbImage> {
    let color = DynamicImage::ImageRgb8(img.to_rgb8());
    let rect = content_bounds(&color, mode)?;
    Some(
        color
            .crop_imm(rect.x, rect.y, rect.width, rect.height)
            .to_rgb8(),
    )
}

/// Crop the flattened image at `path` to its content and write it to `final_path`.
///
/// # Errors
/// [`TexPngError::NoContent`] when the image has no foreground pixels.
pub fn crop_bounding_color(
    path: &Path,
    final_path: &Path,
    mode: CropMode,
) -> Result<(), TexPngError> {
    let img = io::load_image(path)?;
    let cropped = crop_to_content(&img, mode).ok_or_else(|| TexPngError::NoContent {
        path: path.to_path_buf(),
    })?;
    io::save_png(&DynamicImage::ImageRgb8(cropped), final_path)
}

/// Flatten transparency onto `background`, then crop to content, in memory.
pub fn crop_transparent_image(
    img: &DynamicImage,
    background: [u8; 3],
    mode: CropMode,
) -> Option<RgbImage> {
    let flat = DynamicImage::ImageRgba8(composite::remove_transparency(img, background));
    crop_to_content(&flat, mode)
}

/// Remove the transparent margin around the image at `img_path`.
///
/// Transparency is replaced by `background` and the result cropped to its
/// content bounds. The flattened image never touches the disk, so concurrent
/// calls on different files cannot interfere and a failure leaves nothing
/// behind.
pub fn crop_transparent(
    img_path: &Path,
    final_path: &Path,
    background: [u8; 3],
    mode: CropMode,
) -> Result<(), TexPngError> {
    let img = io::load_image(img_path)?;
    let cropped =
        crop_transparent_image(&img, background, mode).ok_or_else(|| TexPngError::NoContent {
            path: img_path.to_path_buf(),
        })?;
    io::save_png(&DynamicImage::ImageRgb8(cropped), final_path)
}

//! Black-to-transparent conversion.
//!
//! The concatenator works on RGB, so a stacked multi-line image comes out
//! with a solid black background. This pass turns exactly-black pixels back
//! into transparency and leaves every other pixel as it was.

use crate::error::TexPngError;
use crate::pipeline::io;
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// What a pure-black pixel becomes: fully transparent white.
pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Replace every pixel whose RGB channels are all zero with [`TRANSPARENT`].
///
/// Alpha is not consulted when matching, and non-black pixels keep their
/// alpha. Applying the conversion twice gives the same image as once.
pub fn black_to_transparent(img: &DynamicImage) -> RgbaImage {
    let mut rgba = img.to_rgba8();
    let mut replaced = 0usize;
    for p in rgba.pixels_mut() {
        if p[0] == 0 && p[1] == 0 && p[2] == 0 {
            *p = TRANSPARENT;
            replaced += 1;
        }
    }
    debug!(
        "Knocked out {} black pixels of {}",
        replaced,
        u64::from(rgba.width()) * u64::from(rgba.height())
    );
    rgba
}

/// File variant of [`black_to_transparent`]. `output` may equal `input`.
pub fn black_to_transparent_file(input: &Path, output: &Path) -> Result<(), TexPngError> {
    // The source is fully decoded before the write starts, so in-place is safe.
    let img = io::load_image(input)?;
    let out = black_to_transparent(&img);
    io::save_png(&DynamicImage::ImageRgba8(out), output)
}

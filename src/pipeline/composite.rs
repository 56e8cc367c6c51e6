//! Transparency compositing: flatten an alpha channel onto a solid colour.
//!
//! The cropper thresholds on luminance and assumes an exactly-black
//! background, so transparent regions must be painted before it runs.

use crate::error::TexPngError;
use crate::pipeline::io;
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Composite `img` over a same-size canvas of `background` ("over" operator).
///
/// The result is fully opaque: every alpha value is 255.
pub fn remove_transparency(img: &DynamicImage, background: [u8; 3]) -> RgbaImage {
    let [r, g, b] = background;
    let mut canvas = img.to_rgba8();
    for px in canvas.pixels_mut() {
        let Rgba([fr, fg, fb, a]) = *px;
        *px = Rgba([over(fr, r, a), over(fg, g, a), over(fb, b, a), 255]);
    }
    debug!(
        "Flattened {}x{} image onto rgb({r}, {g}, {b})",
        img.width(),
        img.height()
    );
    canvas
}

/// One channel of `fg` at alpha `a` over an opaque `bg`, rounded.
fn over(fg: u8, bg: u8, a: u8) -> u8 {
    let a = u32::from(a);
    ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}

/// File variant of [`remove_transparency`]: read `src`, write a PNG to `dst`.
pub fn remove_transparency_file(
    src: &Path,
    dst: &Path,
    background: [u8; 3],
) -> Result<(), TexPngError> {
    let img = io::load_image(src)?;
    let flat = remove_transparency(&img, background);
    io::save_png(&DynamicImage::ImageRgba8(flat), dst)
}

//! Image file access: decode from and encode to paths with typed errors.
//!
//! Every stage that touches the file system goes through here so that a
//! missing file, a permission problem and a corrupt image surface as
//! different [`TexPngError`] variants instead of one opaque `ImageError`.

use crate::error::TexPngError;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use tracing::debug;

/// Open and decode an image, validating the path first.
pub fn load_image(path: &Path) -> Result<DynamicImage, TexPngError> {
    if !path.exists() {
        return Err(TexPngError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Distinguish permission problems from decode failures.
    if let Err(e) = std::fs::File::open(path) {
        return Err(if e.kind() == std::io::ErrorKind::PermissionDenied {
            TexPngError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            TexPngError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        });
    }

    // Format comes from the file's magic bytes, not its extension.
    let io_err = |source| TexPngError::Io {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| TexPngError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Loaded {} → {}x{} px",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Write an image as PNG, creating parent directories as needed.
///
/// PNG is lossless, so there is no quality knob.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<(), TexPngError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TexPngError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| TexPngError::ImageWrite {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Wrote {} ({}x{} px)",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}

/// Remove a file, mapping the failure to [`TexPngError::Io`].
pub fn remove_file(path: &Path) -> Result<(), TexPngError> {
    std::fs::remove_file(path).map_err(|source| TexPngError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn missing_file_is_not_found() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TexPngError::FileNotFound { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, TexPngError::ImageDecode { .. }), "got {err:?}");
    }

    #[test]
    fn png_without_extension_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formula");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 2, Rgba([9, 8, 7, 255])));
        save_png(&img, &path).unwrap();

        let back = load_image(&path).unwrap();
        assert_eq!((back.width(), back.height()), (5, 2));

        let misnamed = dir.path().join("formula.jpg");
        std::fs::copy(&path, &misnamed).unwrap();
        let back = load_image(&misnamed).unwrap();
        assert_eq!(back.to_rgba8().get_pixel(4, 1), &Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn save_creates_parent_dirs_and_roundtrips_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 4])));
        save_png(&img, &path).unwrap();

        let back = load_image(&path).unwrap();
        assert_eq!((back.width(), back.height()), (7, 3));
        assert_eq!(back.to_rgba8().get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }
}

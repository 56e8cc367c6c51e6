//! Error types for the texpng library.
//!
//! Every failure in the render pipeline is fatal to the current request:
//! there are no retries and no partial results. A single [`TexPngError`]
//! therefore covers the whole crate, with one variant per failure class so
//! callers can still tell a missing font from an undecodable intermediate.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the texpng library.
#[derive(Debug, Error)]
pub enum TexPngError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// An input image was not found at the given path.
    #[error("Image file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be decoded as an image.
    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Encoding or writing an image failed.
    #[error("Failed to write image '{path}': {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Plain file-system failure (directory creation, intermediate removal).
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Image pipeline errors ─────────────────────────────────────────────
    /// The image is uniformly background, so there is nothing to crop to.
    #[error("No content found in '{path}': image is uniformly background")]
    NoContent { path: PathBuf },

    /// Vertical concatenation was asked to stack zero images.
    #[error("Cannot concatenate an empty image set")]
    EmptyImageSet,

    /// An image with zero width or height cannot be rescaled.
    #[error("Image {index} in the set has zero width or height")]
    ZeroSizedImage { index: usize },

    /// Every line of a multi-line expression was filtered out before rendering.
    #[error("Nothing to render: all {total} lines were skipped")]
    EmptyRenderSet { total: usize },

    // ── Renderer errors ───────────────────────────────────────────────────
    /// A resource the external renderer needs (font, program) is missing.
    #[error("Renderer resource not found: '{path}'")]
    MissingResource { path: PathBuf },

    /// The external renderer failed on a line.
    #[error("Rendering failed for line {line}: {detail}")]
    RenderFailed { line: usize, detail: String },

    /// The array splitter could not split the expression.
    #[error("Array splitting failed: {0}")]
    SplitFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_render_set_display() {
        let e = TexPngError::EmptyRenderSet { total: 3 };
        assert!(e.to_string().contains("all 3 lines"), "got: {e}");
    }

    #[test]
    fn no_content_display() {
        let e = TexPngError::NoContent {
            path: PathBuf::from("blank.png"),
        };
        assert!(e.to_string().contains("blank.png"));
    }

    #[test]
    fn render_failed_display() {
        let e = TexPngError::RenderFailed {
            line: 2,
            detail: "exit status 1".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;
        let e = TexPngError::Io {
            path: PathBuf::from("out0.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.source().is_some());
    }
}

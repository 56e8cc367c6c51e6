//! Configuration types for LaTeX rendering.
//!
//! All orchestrator behaviour is controlled through [`RenderConfig`], built
//! via its [`RenderConfigBuilder`]. The renderer's fonts live in a separate
//! [`Theme`] value that callers load however they like and hand to the
//! renderer constructor; nothing here reads global state.

use crate::error::TexPngError;
use crate::progress::ProgressCallback;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Foreground colour passed to the renderer: opaque white, as 32-bit ARGB.
pub const DEFAULT_FOREGROUND_ARGB: u32 = 0xFFFF_FFFF;

/// Size parameter passed to the renderer for every line.
pub const DEFAULT_TEXT_SIZE: f32 = 80.0;

/// Base path for per-line intermediates.
pub const DEFAULT_INTERMEDIATE_PATH: &str = "temp.png";

/// Lines containing this marker are treated as plain-text annotations.
pub const DEFAULT_SKIP_MARKER: &str = "text";

/// Configuration for [`crate::convert::render_text`].
///
/// # Example
/// ```rust
/// use texpng::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .intermediate_path("build/line.png")
///     .delete_intermediate(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.text_size, 80.0);
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Foreground colour for rendered glyphs, ARGB. Default: `0xFFFFFFFF`.
    pub foreground_argb: u32,

    /// Renderer size parameter. Default: 80.
    pub text_size: f32,

    /// Base path for per-line images. Every `.png` in it is removed and the
    /// line index appended, so `temp.png` yields `temp0.png`, `temp2.png`, …
    pub intermediate_path: PathBuf,

    /// Remove per-line images once the concatenated output is written.
    /// Default: false.
    pub delete_intermediate: bool,

    /// Substring that marks a line as plain text; such lines are not rendered.
    /// Default: `"text"`.
    pub skip_marker: String,

    /// Remove `(` and `)` during preprocessing. Default: true.
    ///
    /// Stripping is lossy for expressions where parentheses carry meaning
    /// (function application, grouping); turn it off for those.
    pub strip_parentheses: bool,

    /// Resampling filter used when normalising line widths. Default: cubic.
    pub interpolation: FilterType,

    /// Optional per-line progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            foreground_argb: DEFAULT_FOREGROUND_ARGB,
            text_size: DEFAULT_TEXT_SIZE,
            intermediate_path: PathBuf::from(DEFAULT_INTERMEDIATE_PATH),
            delete_intermediate: false,
            skip_marker: DEFAULT_SKIP_MARKER.to_string(),
            strip_parentheses: true,
            interpolation: FilterType::CatmullRom,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("foreground_argb", &format!("{:#010X}", self.foreground_argb))
            .field("text_size", &self.text_size)
            .field("intermediate_path", &self.intermediate_path)
            .field("delete_intermediate", &self.delete_intermediate)
            .field("skip_marker", &self.skip_marker)
            .field("strip_parentheses", &self.strip_parentheses)
            .field("interpolation", &self.interpolation)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RenderProgressCallback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the intermediate image for the line at `index` of the split.
    pub fn intermediate_for(&self, index: usize) -> PathBuf {
        let stem = self.intermediate_path.to_string_lossy().replace(".png", "");
        PathBuf::from(format!("{stem}{index}.png"))
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn foreground_argb(mut self, argb: u32) -> Self {
        self.config.foreground_argb = argb;
        self
    }

    pub fn text_size(mut self, size: f32) -> Self {
        self.config.text_size = size;
        self
    }

    pub fn intermediate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.intermediate_path = path.into();
        self
    }

    pub fn delete_intermediate(mut self, v: bool) -> Self {
        self.config.delete_intermediate = v;
        self
    }

    pub fn skip_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.skip_marker = marker.into();
        self
    }

    pub fn strip_parentheses(mut self, v: bool) -> Self {
        self.config.strip_parentheses = v;
        self
    }

    pub fn interpolation(mut self, filter: FilterType) -> Self {
        self.config.interpolation = filter;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, TexPngError> {
        let c = &self.config;
        if !(c.text_size.is_finite() && c.text_size > 0.0) {
            return Err(TexPngError::InvalidConfig(format!(
                "text size must be a positive number, got {}",
                c.text_size
            )));
        }
        if c.intermediate_path.as_os_str().is_empty() {
            return Err(TexPngError::InvalidConfig(
                "intermediate path must not be empty".into(),
            ));
        }
        if c.skip_marker.is_empty() {
            // An empty marker is contained in every line and would skip everything.
            return Err(TexPngError::InvalidConfig(
                "skip marker must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which rectangle the bounding cropper keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropMode {
    /// Bounding box of every external contour together. (default)
    ///
    /// Disconnected glyphs such as `i`, `=` or multi-symbol expressions all
    /// stay inside the crop.
    #[default]
    Union,
    /// Bounding box of the first external contour only, in scan order.
    FirstContour,
}

/// Fonts handed to the external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Upright math font.
    pub font_math: PathBuf,
    /// Italic math font.
    pub font_math_italic: PathBuf,
}

impl Theme {
    pub fn new(font_math: impl Into<PathBuf>, font_math_italic: impl Into<PathBuf>) -> Self {
        Self {
            font_math: font_math.into(),
            font_math_italic: font_math_italic.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_renderer_parameters() {
        let c = RenderConfig::default();
        assert_eq!(c.foreground_argb, 0xFFFFFFFF);
        assert_eq!(c.text_size, 80.0);
        assert!(!c.delete_intermediate);
        assert!(c.strip_parentheses);
        assert_eq!(CropMode::default(), CropMode::Union);
    }

    #[test]
    fn intermediate_paths_strip_png_and_append_index() {
        let c = RenderConfig::default();
        assert_eq!(c.intermediate_for(0), PathBuf::from("temp0.png"));
        assert_eq!(c.intermediate_for(3), PathBuf::from("temp3.png"));

        let c = RenderConfig::builder()
            .intermediate_path("out/line")
            .build()
            .unwrap();
        assert_eq!(c.intermediate_for(1), PathBuf::from("out/line1.png"));
    }

    #[test]
    fn build_rejects_bad_size() {
        assert!(RenderConfig::builder().text_size(0.0).build().is_err());
        assert!(RenderConfig::builder().text_size(f32::NAN).build().is_err());
    }

    #[test]
    fn build_rejects_empty_marker() {
        let err = RenderConfig::builder().skip_marker("").build().unwrap_err();
        assert!(matches!(err, TexPngError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let s = format!("{:?}", RenderConfig::default());
        assert!(s.contains("0xFFFFFFFF"), "got: {s}");
    }

    #[test]
    fn debug_lists_only_render_settings() {
        // Crop settings belong to the crop stage, not to `render_text`.
        let s = format!("{:?}", RenderConfig::default());
        assert!(!s.contains("background"), "got: {s}");
        assert!(!s.contains("crop_mode"), "got: {s}");
    }
}

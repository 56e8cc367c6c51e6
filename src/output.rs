//! Result types returned by the render orchestrator.
//!
//! Everything here is `Serialize` so the CLI can print a run as JSON.

use serde::Serialize;
use std::path::PathBuf;

/// What happened to one line of the preprocessed expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineResult {
    /// Position of the line in the newline split (0-based). Skipped lines
    /// keep their slot, so rendered indices can be non-contiguous.
    pub index: usize,
    /// The line as handed to the renderer.
    pub expr: String,
    /// Where the rendered line was written; `None` when skipped.
    pub path: Option<PathBuf>,
    /// True when the line carried the plain-text marker.
    pub skipped: bool,
}

/// Timing and size figures for a render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderStats {
    /// Lines after preprocessing and splitting.
    pub total_lines: usize,
    /// Lines sent to the renderer.
    pub rendered_lines: usize,
    /// Lines filtered out by the plain-text marker.
    pub skipped_lines: usize,
    /// Final image width in pixels.
    pub width: u32,
    /// Final image height in pixels.
    pub height: u32,
    /// Wall-clock time for the whole render.
    pub total_duration_ms: u64,
}

/// Complete result of [`crate::convert::render_text`].
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    /// The LaTeX after preprocessing (newline-joined for arrays).
    pub latex: String,
    /// Final image location.
    pub output_path: PathBuf,
    /// Per-line outcome, in split order. Empty for single-line input.
    pub lines: Vec<LineResult>,
    /// Intermediate files produced, in concatenation order.
    pub intermediates: Vec<PathBuf>,
    /// Whether the intermediates were removed after concatenation.
    pub intermediates_deleted: bool,
    pub stats: RenderStats,
}

impl RenderOutput {
    /// True when the multi-line branch ran.
    pub fn is_multiline(&self) -> bool {
        !self.lines.is_empty()
    }
}

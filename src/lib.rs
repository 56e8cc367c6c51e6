//! # texpng
//!
//! Render LaTeX expressions into cropped, transparent-background PNG images.
//!
//! The glyph work is done by an external renderer behind the
//! [`LatexRenderer`] trait. This crate supplies the plumbing around it:
//! preprocessing the expression, rendering array rows one line at a time,
//! stacking the lines at a common width, turning the black background back
//! into transparency, and trimming transparent margins.
//!
//! ## Pipeline Overview
//!
//! ```text
//! LaTeX
//!  │
//!  ├─ 1. Preprocess  strip spaces/parentheses, split arrays into rows
//!  ├─ 2. Render      one renderer call per line (plain-text lines skipped)
//!  ├─ 3. Concat      scale lines to the narrowest width, stack top to bottom
//!  ├─ 4. Knockout    pure black → transparent
//!  └─ 5. Output      PNG on disk + per-line report
//! ```
//!
//! [`crop_transparent`] is the standalone companion: flatten transparency
//! onto a background colour and crop to the content bounds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use texpng::{render_text, ArrayRowSplitter, CommandRenderer, RenderConfig, Theme};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let theme = Theme::new("fonts/latinmodern-math.otf", "fonts/lmroman-italic.otf");
//!     let renderer = CommandRenderer::new("tex2png", vec![], theme)?;
//!     let config = RenderConfig::builder().delete_intermediate(true).build()?;
//!
//!     let latex = r"\frac{a}{b}";
//!     let output = render_text(latex, "formula.png", &renderer, &ArrayRowSplitter, &config)?;
//!     eprintln!("{}x{} px", output.stats.width, output.stats.height);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `texpng` binary (clap, anyhow, indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CropMode, RenderConfig, RenderConfigBuilder, Theme};
pub use convert::render_text;
pub use engine::{CommandRenderer, LatexRenderer};
pub use error::TexPngError;
pub use output::{LineResult, RenderOutput, RenderStats};
pub use pipeline::composite::{remove_transparency, remove_transparency_file};
pub use pipeline::concat::{vconcat_files, vconcat_resize_min};
pub use pipeline::crop::{crop_bounding_color, crop_transparent, crop_transparent_image, CropRect};
pub use pipeline::knockout::{black_to_transparent, black_to_transparent_file};
pub use pipeline::preprocess::{process_latex, ArrayRowSplitter, ArraySplitter};
pub use progress::{NoopProgressCallback, ProgressCallback, RenderProgressCallback};

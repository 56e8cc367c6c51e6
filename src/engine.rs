//! The external LaTeX renderer seam.
//!
//! Glyph layout and font shaping are not done here. A [`LatexRenderer`]
//! turns one expression into one image; the orchestrator calls it once per
//! line. Each call is a plain request/response, so there is no renderer
//! state to clear between lines.
//!
//! [`CommandRenderer`] adapts any program that can write a PNG for an
//! expression, configured with an argument template.

use crate::config::Theme;
use crate::error::TexPngError;
use crate::pipeline::io;
use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

/// Renders a single LaTeX expression to an image.
pub trait LatexRenderer {
    /// Render `expr` in `foreground_argb` (32-bit ARGB) at `size`.
    ///
    /// Implementations report failures as [`TexPngError::RenderFailed`];
    /// the orchestrator fills in the line index.
    fn render(
        &self,
        expr: &str,
        foreground_argb: u32,
        size: f32,
    ) -> Result<DynamicImage, TexPngError>;
}

/// Argument template used when none is given.
pub const DEFAULT_ARGS: &[&str] = &[
    "--font",
    "{font}",
    "--font-italic",
    "{font_italic}",
    "--color",
    "{color}",
    "--size",
    "{size}",
    "--output",
    "{out}",
    "{expr}",
];

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(expr|out|size|color|font|font_italic)\}").expect("valid regex")
});

/// Runs an external program once per expression.
///
/// Each argument may contain the placeholders `{expr}`, `{out}`, `{size}`,
/// `{color}` (as `0xAARRGGBB`), `{font}` and `{font_italic}`. The program
/// must write a PNG to `{out}`, which lives in a fresh temporary directory
/// for every call.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
    theme: Theme,
}

impl CommandRenderer {
    /// Create a renderer, checking that the theme fonts exist.
    ///
    /// A `program` given as a path (anything with a separator) must exist
    /// too; bare names are resolved through `PATH` when first run.
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        theme: Theme,
    ) -> Result<Self, TexPngError> {
        let program = program.into();
        if program.components().count() > 1 && !program.exists() {
            return Err(TexPngError::MissingResource { path: program });
        }
        for font in [&theme.font_math, &theme.font_math_italic] {
            if !font.exists() {
                return Err(TexPngError::MissingResource { path: font.clone() });
            }
        }
        let args = if args.is_empty() {
            DEFAULT_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            args
        };
        Ok(Self {
            program,
            args,
            theme,
        })
    }

    /// Substitute placeholders in one argument, in a single pass.
    fn expand(&self, template: &str, expr: &str, out: &Path, color: u32, size: f32) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
                "expr" => expr.to_string(),
                "out" => out.display().to_string(),
                "size" => size.to_string(),
                "color" => format!("{color:#010X}"),
                "font" => self.theme.font_math.display().to_string(),
                "font_italic" => self.theme.font_math_italic.display().to_string(),
                other => other.to_string(),
            })
            .into_owned()
    }
}

impl LatexRenderer for CommandRenderer {
    fn render(
        &self,
        expr: &str,
        foreground_argb: u32,
        size: f32,
    ) -> Result<DynamicImage, TexPngError> {
        let dir = TempDir::new().map_err(|source| TexPngError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
        let out = dir.path().join("expr.png");
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| self.expand(a, expr, &out, foreground_argb, size))
            .collect();
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    TexPngError::MissingResource {
                        path: self.program.clone(),
                    }
                } else {
                    TexPngError::Io {
                        path: self.program.clone(),
                        source,
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TexPngError::RenderFailed {
                line: 0,
                detail: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }
        if !out.exists() {
            return Err(TexPngError::RenderFailed {
                line: 0,
                detail: format!("{} produced no image", self.program.display()),
            });
        }

        // Decoded fully into memory before `dir` is dropped and removed.
        io::load_image(&out)
    }
}

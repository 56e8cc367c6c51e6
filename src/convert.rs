//! Render orchestration: LaTeX string in, image file out.
//!
//! After preprocessing, a newline in the expression selects the multi-line
//! path:
//!
//! ```text
//! split on '\n' ─▶ render each line ─▶ write {stem}{index}.png
//!                  (skip plain-text)          │
//!               read back in order ◀──────────┘
//!                         │
//!      concat ─▶ black → transparent ─▶ write output ─▶ [delete intermediates]
//! ```
//!
//! Single-line input is rendered straight to the output path with no
//! further processing. Every failure aborts the render; intermediates
//! already written are left on disk in that case.

use crate::config::RenderConfig;
use crate::engine::LatexRenderer;
use crate::error::TexPngError;
use crate::output::{LineResult, RenderOutput, RenderStats};
use crate::pipeline::preprocess::{self, ArraySplitter};
use crate::pipeline::{concat, io, knockout};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Render `latex` to `write_path`.
///
/// # Arguments
/// * `latex`      — raw LaTeX as typed by the user
/// * `write_path` — final PNG location
/// * `renderer`   — produces one image per expression
/// * `splitter`   — splits array expressions into rows
/// * `config`     — renderer parameters, intermediate naming, cleanup
///
/// # Errors
/// Any renderer, decode or write failure, and
/// [`TexPngError::EmptyRenderSet`] when every line is plain text.
pub fn render_text(
    latex: &str,
    write_path: impl AsRef<Path>,
    renderer: &dyn LatexRenderer,
    splitter: &dyn ArraySplitter,
    config: &RenderConfig,
) -> Result<RenderOutput, TexPngError> {
    let start = Instant::now();
    let write_path = write_path.as_ref();
    info!("rendering");

    let latex = preprocess::process_latex(latex, splitter, config.strip_parentheses)?;

    let mut output = if latex.contains('\n') {
        info!("newline found");
        render_multiline(&latex, write_path, renderer, config)?
    } else {
        render_single(&latex, write_path, renderer, config)?
    };

    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(write_path, output.stats.rendered_lines);
    }
    info!("done rendering, file is at {}", write_path.display());
    Ok(output)
}

/// Render one line, attaching its index to renderer failures.
fn render_line(
    renderer: &dyn LatexRenderer,
    expr: &str,
    index: usize,
    config: &RenderConfig,
) -> Result<DynamicImage, TexPngError> {
    renderer
        .render(expr, config.foreground_argb, config.text_size)
        .map_err(|e| match e {
            TexPngError::RenderFailed { detail, .. } => TexPngError::RenderFailed {
                line: index,
                detail,
            },
            other => other,
        })
}

fn render_single(
    latex: &str,
    write_path: &Path,
    renderer: &dyn LatexRenderer,
    config: &RenderConfig,
) -> Result<RenderOutput, TexPngError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(1);
    }

    info!("beginning to render...");
    let img = render_line(renderer, latex, 0, config)?;
    info!("making image...");
    io::save_png(&img, write_path)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_line_rendered(0, 1, write_path);
    }

    Ok(RenderOutput {
        latex: latex.to_string(),
        output_path: write_path.to_path_buf(),
        lines: Vec::new(),
        intermediates: Vec::new(),
        intermediates_deleted: false,
        stats: RenderStats {
            total_lines: 1,
            rendered_lines: 1,
            skipped_lines: 0,
            width: img.width(),
            height: img.height(),
            total_duration_ms: 0,
        },
    })
}

fn render_multiline(
    latex: &str,
    write_path: &Path,
    renderer: &dyn LatexRenderer,
    config: &RenderConfig,
) -> Result<RenderOutput, TexPngError> {
    let exprs: Vec<&str> = latex.split('\n').collect();
    let total = exprs.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(total);
    }

    let mut lines = Vec::with_capacity(total);
    let mut paths: Vec<PathBuf> = Vec::new();

    for (index, expr) in exprs.iter().enumerate() {
        if expr.contains(config.skip_marker.as_str()) {
            warn!("skipping plain-text line {}: {}", index, expr);
            if let Some(ref cb) = config.progress_callback {
                cb.on_line_skipped(index, expr);
            }
            lines.push(LineResult {
                index,
                expr: expr.to_string(),
                path: None,
                skipped: true,
            });
            continue;
        }

        info!("{}: {}", expr, index);
        let img = render_line(renderer, expr, index, config)?;
        // Named by position in the full split, so skipped lines leave gaps.
        let path = config.intermediate_for(index);
        io::save_png(&img, &path)?;

        if let Some(ref cb) = config.progress_callback {
            cb.on_line_rendered(index, total, &path);
        }
        lines.push(LineResult {
            index,
            expr: expr.to_string(),
            path: Some(path.clone()),
            skipped: false,
        });
        paths.push(path);
    }

    if paths.is_empty() {
        return Err(TexPngError::EmptyRenderSet { total });
    }

    for p in &paths {
        debug!("{}", p.display());
    }
    let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    let stacked = concat::vconcat_files(&refs, config.interpolation)?;
    let knocked = knockout::black_to_transparent(&DynamicImage::ImageRgb8(stacked));
    let (width, height) = knocked.dimensions();
    io::save_png(&DynamicImage::ImageRgba8(knocked), write_path)?;

    if config.delete_intermediate {
        info!("deleting...");
        for p in &paths {
            io::remove_file(p)?;
        }
    }

    let rendered_lines = paths.len();
    Ok(RenderOutput {
        latex: latex.to_string(),
        output_path: write_path.to_path_buf(),
        lines,
        intermediates: paths,
        intermediates_deleted: config.delete_intermediate,
        stats: RenderStats {
            total_lines: total,
            rendered_lines,
            skipped_lines: total - rendered_lines,
            width,
            height,
            total_duration_ms: 0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::ArrayRowSplitter;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    /// Renders a white bar whose width grows with the expression length.
    struct BarRenderer {
        calls: RefCell<Vec<(String, u32, f32)>>,
    }

    impl BarRenderer {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl LatexRenderer for BarRenderer {
        fn render(&self, expr: &str, argb: u32, size: f32) -> Result<DynamicImage, TexPngError> {
            self.calls.borrow_mut().push((expr.to_string(), argb, size));
            let w = 10 * expr.len().max(1) as u32;
            let mut img = RgbaImage::from_pixel(w, 20, Rgba([0, 0, 0, 0]));
            for x in 2..w - 2 {
                img.put_pixel(x, 10, Rgba([255, 255, 255, 255]));
            }
            Ok(DynamicImage::ImageRgba8(img))
        }
    }

    struct FailingRenderer;

    impl LatexRenderer for FailingRenderer {
        fn render(&self, _: &str, _: u32, _: f32) -> Result<DynamicImage, TexPngError> {
            Err(TexPngError::RenderFailed {
                line: 0,
                detail: "no glyph".into(),
            })
        }
    }

    #[test]
    fn single_line_passes_renderer_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("x.png");
        let r = BarRenderer::new();

        let result =
            render_text("x ^ 2", &out, &r, &ArrayRowSplitter, &RenderConfig::default()).unwrap();
        assert!(!result.is_multiline());
        assert_eq!(result.latex, "x^2");
        assert_eq!(
            r.calls.borrow().as_slice(),
            &[("x^2".to_string(), 0xFFFFFFFF, 80.0)]
        );
        assert!(out.exists());
    }

    #[test]
    fn renderer_failure_carries_line_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::builder()
            .intermediate_path(dir.path().join("line.png"))
            .build()
            .unwrap();
        let err = render_text(
            "\\text{a}\nb",
            dir.path().join("o.png"),
            &FailingRenderer,
            &ArrayRowSplitter,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, TexPngError::RenderFailed { line: 1, .. }), "got {err:?}");
    }

    #[test]
    fn all_lines_skipped_is_empty_render_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::builder()
            .intermediate_path(dir.path().join("line.png"))
            .build()
            .unwrap();
        let err = render_text(
            "\\text{a}\n\\text{b}",
            dir.path().join("o.png"),
            &BarRenderer::new(),
            &ArrayRowSplitter,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, TexPngError::EmptyRenderSet { total: 2 }));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn skipped_line_logs_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::builder()
            .intermediate_path(dir.path().join("line.png"))
            .build()
            .unwrap();
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            render_text(
                "a\n\\text{note}\nb",
                dir.path().join("o.png"),
                &BarRenderer::new(),
                &ArrayRowSplitter,
                &config,
            )
            .unwrap();
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line = text
            .lines()
            .find(|l| l.contains("skipping plain-text line 1"))
            .unwrap_or_else(|| panic!("no skip log in:\n{text}"));
        assert!(line.contains("WARN"), "got: {line}");
    }

    #[test]
    fn repeated_lines_get_their_own_intermediates() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::builder()
            .intermediate_path(dir.path().join("temp.png"))
            .build()
            .unwrap();
        let r = BarRenderer::new();

        let result = render_text("a\na", dir.path().join("o.png"), &r, &ArrayRowSplitter, &config)
            .unwrap();

        assert_eq!(
            result.intermediates,
            vec![dir.path().join("temp0.png"), dir.path().join("temp1.png")]
        );
        assert!(result.intermediates.iter().all(|p| p.exists()));
        assert_eq!(r.calls.borrow().len(), 2);
        assert_eq!(result.stats.rendered_lines, 2);
    }
}

//! CLI binary for texpng.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RenderConfig` and the image helpers, and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use texpng::pipeline::{concat, encode, io as image_io};
use texpng::{
    black_to_transparent_file, crop_transparent, render_text, ArrayRowSplitter, CommandRenderer,
    CropMode, ProgressCallback, RenderConfig, RenderProgressCallback, Theme,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner plus one log line per rendered or
/// skipped line.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Rendering");
        bar.set_message("Preprocessing…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RenderProgressCallback for CliProgressCallback {
    fn on_render_start(&self, total_lines: usize) {
        self.bar.set_length(total_lines as u64);
        self.bar.set_message(format!("{total_lines} line(s)"));
    }

    fn on_line_skipped(&self, index: usize, expr: &str) {
        self.bar
            .println(format!("  {} line {:>2}  {}", dim("–"), index, dim(expr)));
        self.bar.inc(1);
    }

    fn on_line_rendered(&self, index: usize, total_lines: usize, path: &Path) {
        self.bar.println(format!(
            "  {} line {:>2}/{:<2}  {}",
            green("✓"),
            index,
            total_lines,
            dim(&path.display().to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_render_complete(&self, output: &Path, rendered_lines: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} line(s) rendered  →  {}",
            green("✔"),
            bold(&rendered_lines.to_string()),
            bold(&output.display().to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a formula with an external renderer program
  texpng render 'x^2 + y^2 = z^2' -o pythagoras.png \
      --renderer tex2png --font-math math.otf --font-math-italic math-italic.otf

  # Render an array row by row, removing the per-line images afterwards
  texpng render '\begin{array}{c} a=1 \\ b=2 \end{array}' -o system.png \
      --renderer tex2png --font-math math.otf --font-math-italic math-italic.otf \
      --delete-intermediate

  # Trim the transparent margin around an existing image
  texpng crop formula.png formula-cropped.png

  # Turn pure black into transparency
  texpng knockout stacked.png stacked.png

  # Stack images at a common width
  texpng concat line0.png line1.png -o stacked.png

RENDERER ARGUMENTS:
  --renderer-arg may be repeated; each value can use the placeholders
  {expr} {out} {size} {color} {font} {font_italic}. Without any, the
  renderer is called as:
    <renderer> --font {font} --font-italic {font_italic} --color {color}
               --size {size} --output {out} {expr}
"#;

/// Render LaTeX into cropped, transparent-background PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "texpng",
    version,
    about = "Render LaTeX into cropped, transparent-background PNG images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "TEXPNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "TEXPNG_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a LaTeX expression to a PNG.
    Render(RenderArgs),

    /// Flatten transparency onto a background colour and crop to content.
    Crop {
        input: PathBuf,
        output: PathBuf,

        /// Background colour as R,G,B.
        #[arg(long, default_value = "0,0,0", value_parser = parse_rgb)]
        background: [u8; 3],

        /// Keep only the first content region instead of all of them.
        #[arg(long)]
        first_contour: bool,
    },

    /// Replace pure-black pixels with transparency.
    Knockout { input: PathBuf, output: PathBuf },

    /// Scale images to the narrowest width and stack them vertically.
    Concat {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// LaTeX expression.
    latex: String,

    /// Output PNG path.
    #[arg(short, long, env = "TEXPNG_OUTPUT")]
    output: PathBuf,

    /// Renderer program (name on PATH or path).
    #[arg(long, env = "TEXPNG_RENDERER")]
    renderer: PathBuf,

    /// Renderer argument template; repeat for each argument.
    #[arg(long = "renderer-arg", allow_hyphen_values = true)]
    renderer_args: Vec<String>,

    /// Upright math font handed to the renderer.
    #[arg(long, env = "TEXPNG_FONT_MATH")]
    font_math: PathBuf,

    /// Italic math font handed to the renderer.
    #[arg(long, env = "TEXPNG_FONT_MATH_ITALIC")]
    font_math_italic: PathBuf,

    /// Base path for per-line images of multi-line expressions.
    #[arg(long, env = "TEXPNG_INTERMEDIATE", default_value = "temp.png")]
    intermediate: PathBuf,

    /// Remove per-line images after stacking.
    #[arg(long)]
    delete_intermediate: bool,

    /// Keep parentheses instead of stripping them.
    #[arg(long)]
    keep_parens: bool,

    /// Renderer size parameter.
    #[arg(long, default_value_t = texpng::config::DEFAULT_TEXT_SIZE)]
    size: f32,

    /// Print a JSON report of the render on stdout.
    #[arg(long)]
    json: bool,

    /// Print the output image as a base64 data URI on stdout.
    #[arg(long)]
    data_uri: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "TEXPNG_NO_PROGRESS")]
    no_progress: bool,
}

fn parse_rgb(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("expected R,G,B, got '{s}'"));
    };
    let channel = |v: &str| {
        v.parse::<u8>()
            .map_err(|_| format!("'{v}' is not a value in 0–255"))
    };
    Ok([channel(r)?, channel(g)?, channel(b)?])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Cmd::Render(args) => run_render(args, cli.quiet),
        Cmd::Crop {
            input,
            output,
            background,
            first_contour,
        } => {
            let mode = if first_contour {
                CropMode::FirstContour
            } else {
                CropMode::Union
            };
            crop_transparent(&input, &output, background, mode)
                .with_context(|| format!("Failed to crop {}", input.display()))?;
            report(cli.quiet, &output);
            Ok(())
        }
        Cmd::Knockout { input, output } => {
            black_to_transparent_file(&input, &output)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
            report(cli.quiet, &output);
            Ok(())
        }
        Cmd::Concat { inputs, output } => {
            let refs: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
            concat::vconcat_files_to(
                &refs,
                &output,
                image::imageops::FilterType::CatmullRom,
            )
            .context("Failed to concatenate images")?;
            report(cli.quiet, &output);
            Ok(())
        }
    }
}

fn report(quiet: bool, output: &Path) {
    if !quiet {
        eprintln!("{}  {}", green("✔"), bold(&output.display().to_string()));
    }
}

fn run_render(args: RenderArgs, quiet: bool) -> Result<()> {
    let theme = Theme::new(&args.font_math, &args.font_math_italic);
    let renderer = CommandRenderer::new(&args.renderer, args.renderer_args.clone(), theme)
        .context("Failed to set up renderer")?;

    let show_progress = !quiet && !args.no_progress && !args.json && !args.data_uri;
    let mut builder = RenderConfig::builder()
        .text_size(args.size)
        .intermediate_path(&args.intermediate)
        .delete_intermediate(args.delete_intermediate)
        .strip_parentheses(!args.keep_parens);
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    let output = render_text(
        &args.latex,
        &args.output,
        &renderer,
        &ArrayRowSplitter,
        &config,
    )
    .context("Rendering failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }
    if args.data_uri {
        let img = image_io::load_image(&output.output_path).context("Failed to read output")?;
        println!(
            "{}",
            encode::to_data_uri(&img).context("Failed to encode output")?
        );
    }
    if !quiet && !show_progress {
        eprintln!(
            "Rendered {}/{} lines ({}x{} px) in {}ms → {}",
            output.stats.rendered_lines,
            output.stats.total_lines,
            output.stats.width,
            output.stats.height,
            output.stats.total_duration_ms,
            output.output_path.display()
        );
    }
    Ok(())
}

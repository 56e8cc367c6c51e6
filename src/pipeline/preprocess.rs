//! LaTeX preprocessing: normalise the raw input and split arrays into lines.
//!
//! Spaces are dropped, and by default so are both parenthesis characters.
//! An expression that mentions `array` is handed to an [`ArraySplitter`]
//! and comes back as one row per line, newline-joined; the orchestrator
//! then renders each line separately.

use crate::error::TexPngError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Splits an array/matrix expression into one expression per row.
pub trait ArraySplitter {
    /// Return the rows of `latex` in order.
    fn split_array(&self, latex: &str) -> Result<Vec<String>, TexPngError>;
}

impl<F> ArraySplitter for F
where
    F: Fn(&str) -> Result<Vec<String>, TexPngError>,
{
    fn split_array(&self, latex: &str) -> Result<Vec<String>, TexPngError> {
        self(latex)
    }
}

static ARRAY_ENV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\begin\{array\}(?:\{[^{}]*\})?(.*?)\\end\{array\}").expect("valid regex")
});

/// Row splitter for `\begin{array}{cols} … \end{array}`.
///
/// Rows are separated by `\\`. Leading `\hline` rules and empty rows are
/// dropped. Input without an array environment comes back as a single row.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRowSplitter;

impl ArraySplitter for ArrayRowSplitter {
    fn split_array(&self, latex: &str) -> Result<Vec<String>, TexPngError> {
        let Some(caps) = ARRAY_ENV.captures(latex) else {
            return Ok(vec![latex.to_string()]);
        };
        let body = caps.get(1).map_or("", |m| m.as_str());

        let rows: Vec<String> = body
            .split(r"\\")
            .map(|row| {
                let mut row = row.trim();
                while let Some(rest) = row.strip_prefix(r"\hline") {
                    row = rest.trim_start();
                }
                row.to_string()
            })
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(TexPngError::SplitFailed(format!(
                "array environment has no rows: {latex}"
            )));
        }
        debug!("Split array into {} rows", rows.len());
        Ok(rows)
    }
}

/// Remove spaces and, when `strip_parentheses` is set, `(` and `)`.
///
/// Newlines are kept, so multi-line input stays multi-line.
pub fn clean_latex(latex: &str, strip_parentheses: bool) -> String {
    latex
        .chars()
        .filter(|&c| c != ' ' && !(strip_parentheses && (c == '(' || c == ')')))
        .collect()
}

/// Prepare raw LaTeX for rendering.
///
/// Cleans the string with [`clean_latex`]; if the result contains `array`,
/// the splitter's rows are joined with `\n`.
pub fn process_latex(
    latex: &str,
    splitter: &dyn ArraySplitter,
    strip_parentheses: bool,
) -> Result<String, TexPngError> {
    let cleaned = clean_latex(latex, strip_parentheses);
    if cleaned.contains("array") {
        let rows = splitter.split_array(&cleaned)?;
        let joined = rows.join("\n");
        info!("process_latex: {}", joined);
        return Ok(joined);
    }

    info!("process_latex: {}", cleaned);
    Ok(cleaned)
}

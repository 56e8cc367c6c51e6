//! Progress-callback trait for per-line render events.
//!
//! Inject an [`Arc<dyn RenderProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to receive
//! events as the orchestrator works through a multi-line expression. The
//! single-line path reports one start and one completion.
//!
//! # Example
//!
//! ```rust
//! use texpng::{RenderConfig, RenderProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl RenderProgressCallback for CountingCallback {
//!     fn on_line_rendered(&self, index: usize, total_lines: usize, _path: &std::path::Path) {
//!         let done = self.rendered.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("line {index} of {total_lines} done ({done} so far)");
//!     }
//! }
//!
//! let config = RenderConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { rendered: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the orchestrator as it renders each line.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Rendering is sequential, but the trait is
/// `Send + Sync` so one callback can be shared across threads that each run
/// their own render.
pub trait RenderProgressCallback: Send + Sync {
    /// Called once after preprocessing, before any line is rendered.
    ///
    /// # Arguments
    /// * `total_lines` — number of lines in the split, including ones that
    ///   will be skipped (1 for single-line input)
    fn on_render_start(&self, total_lines: usize) {
        let _ = total_lines;
    }

    /// Called when a line is skipped because it carries the plain-text marker.
    fn on_line_skipped(&self, index: usize, expr: &str) {
        let _ = (index, expr);
    }

    /// Called after a line has been rendered and written.
    ///
    /// # Arguments
    /// * `index`       — position of the line in the split (0-based)
    /// * `total_lines` — number of lines in the split
    /// * `path`        — where the line image was written
    fn on_line_rendered(&self, index: usize, total_lines: usize, path: &Path) {
        let _ = (index, total_lines, path);
    }

    /// Called once when the final image is in place.
    fn on_render_complete(&self, output: &Path, rendered_lines: usize) {
        let _ = (output, rendered_lines);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenderProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn RenderProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        total: AtomicUsize,
        skipped: AtomicUsize,
        rendered: AtomicUsize,
        completed_with: AtomicUsize,
    }

    impl RenderProgressCallback for TrackingCallback {
        fn on_render_start(&self, total_lines: usize) {
            self.total.store(total_lines, Ordering::SeqCst);
        }

        fn on_line_skipped(&self, _index: usize, _expr: &str) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }

        fn on_line_rendered(&self, _index: usize, _total_lines: usize, _path: &Path) {
            self.rendered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_render_complete(&self, _output: &Path, rendered_lines: usize) {
            self.completed_with.store(rendered_lines, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_render_start(3);
        cb.on_line_skipped(1, r"\text{where}");
        cb.on_line_rendered(0, 3, Path::new("temp0.png"));
        cb.on_render_complete(Path::new("out.png"), 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_render_start(3);
        tracker.on_line_rendered(0, 3, Path::new("temp0.png"));
        tracker.on_line_skipped(1, r"\text{note}");
        tracker.on_line_rendered(2, 3, Path::new("temp2.png"));
        tracker.on_render_complete(Path::new("out.png"), 2);

        assert_eq!(tracker.total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.rendered.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completed_with.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_render_start(1);
        cb.on_render_complete(Path::new("x.png"), 1);
    }
}

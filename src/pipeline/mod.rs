//! Image stages of the LaTeX rendering pipeline.
//!
//! Each submodule implements exactly one transformation step and offers
//! both an in-memory function and a path-based wrapper around it.
//!
//! ## Data Flow
//!
//! ```text
//! preprocess ──▶ (renderer, per line) ──▶ concat ──▶ knockout
//!  (clean/split)                          (stack)    (black → alpha)
//!
//! composite ──▶ crop                       (standalone: trim margins)
//! ```
//!
//! 1. [`preprocess`] — strip spaces/parentheses, split arrays into lines
//! 2. [`concat`]     — scale lines to a common width and stack them
//! 3. [`knockout`]   — turn the black background back into transparency
//! 4. [`composite`]  — flatten transparency onto a solid colour
//! 5. [`crop`]       — cut an image down to its content bounds
//!
//! [`io`] and [`encode`] hold the shared file and PNG helpers.

pub mod composite;
pub mod concat;
pub mod crop;
pub mod encode;
pub mod io;
pub mod knockout;
pub mod preprocess;

//! Rotated-frame preview
//!
//! Renders a single rotated frame from the midpoint of a video so the user
//! can check the angle before committing to a batch job.

pub mod extractor;

pub use extractor::{render_preview, PreviewError, PreviewFrame};

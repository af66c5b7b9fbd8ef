//! Video rotation module
//!
//! This module builds the ffmpeg invocations that perform the actual
//! rotation and orchestrates batch jobs with progress reporting and
//! cancellation.

pub mod naming;
pub mod pipeline;
pub mod transcode;
pub mod types;

pub use pipeline::RotationPipeline;
pub use types::{
    OverwritePolicy, RotationAngle, RotationError, RotationOptions, RotationOutcome,
    RotationProgress, RotationQuality, RotationStage, RotationSummary,
};

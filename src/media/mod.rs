//! External transcoder integration
//!
//! Clipturn performs no media processing of its own; ffmpeg and ffprobe do
//! the real work. This module locates those binaries and probes input files.

pub mod locate;
pub mod probe;

pub use locate::ToolchainStatus;
pub use probe::VideoMetadata;

use thiserror::Error;

/// Errors from locating or driving the external toolchain
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toolchain error: {0}")]
    ToolchainMissing(String),

    #[error("ffprobe error: {0}")]
    Probe(String),
}

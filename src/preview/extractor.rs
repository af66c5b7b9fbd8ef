//! FFmpeg-based preview frame extraction
//!
//! Seeks to the midpoint of the source, applies the rotation filter, and
//! writes exactly one frame as PNG into the system temp directory.

use crate::media::{locate, probe, MediaError};
use crate::rotation::types::RotationAngle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// A rendered preview frame on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    /// Path to the rendered PNG in the system temp directory
    pub image_path: String,
    /// Timestamp the frame was taken from, in milliseconds
    pub timestamp_ms: u64,
}

/// Preview errors
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("invalid rotation angle: {0}")]
    InvalidAngle(String),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),
}

/// Render one rotated frame from the midpoint of the video.
///
/// The frame is written to a persisted temp file; the caller owns cleanup.
pub async fn render_preview(
    input: &Path,
    angle: RotationAngle,
) -> Result<PreviewFrame, PreviewError> {
    angle
        .validate()
        .map_err(|e| PreviewError::InvalidAngle(e.to_string()))?;

    let ffmpeg = locate::ffmpeg_path()?;
    let duration_ms = probe::video_duration_ms(input)?;
    let seek_ms = midpoint_ms(duration_ms);

    let target = tempfile::Builder::new()
        .prefix("clipturn-preview-")
        .suffix(".png")
        .tempfile()?
        .into_temp_path();
    let target_path: PathBuf = target
        .keep()
        .map_err(|e| PreviewError::Ffmpeg(format!("failed to keep preview file: {}", e)))?;

    let output = Command::new(&ffmpeg)
        .args(["-y", "-v", "error", "-hide_banner", "-nostdin"])
        .arg("-ss")
        .arg(format_seek(seek_ms))
        .arg("-i")
        .arg(input)
        .arg("-vf")
        .arg(angle.filter())
        .args(["-frames:v", "1"])
        .arg(&target_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let _ = std::fs::remove_file(&target_path);
        return Err(PreviewError::Ffmpeg(format!(
            "preview extraction failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    tracing::debug!("Rendered preview for {:?} at {}ms", input, seek_ms);

    Ok(PreviewFrame {
        image_path: target_path.to_string_lossy().to_string(),
        timestamp_ms: seek_ms,
    })
}

/// Seek target: the middle of the stream
fn midpoint_ms(duration_ms: u64) -> u64 {
    duration_ms / 2
}

/// FFmpeg accepts fractional seconds for `-ss`
fn format_seek(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint_ms(10_000), 5_000);
        assert_eq!(midpoint_ms(0), 0);
        assert_eq!(midpoint_ms(1), 0);
    }

    #[test]
    fn test_format_seek() {
        assert_eq!(format_seek(65_432), "65.432");
        assert_eq!(format_seek(500), "0.500");
        assert_eq!(format_seek(0), "0.000");
        assert_eq!(format_seek(2_000), "2.000");
    }
}

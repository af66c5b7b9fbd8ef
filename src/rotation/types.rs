//! Rotation types and configuration
//!
//! This module defines the types used for rotation job configuration,
//! progress tracking, and error handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Rotation selection offered by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RotationAngle {
    Cw90,
    Cw180,
    Cw270,
    Custom { degrees: f64 },
}

impl RotationAngle {
    /// The ffmpeg `-vf` expression for this rotation.
    ///
    /// Quarter turns use lossless transposition. Arbitrary angles rasterize
    /// onto the source canvas, so corners clip.
    pub fn filter(&self) -> String {
        match self {
            RotationAngle::Cw90 => "transpose=1".to_string(),
            RotationAngle::Cw180 => "transpose=2,transpose=2".to_string(),
            RotationAngle::Cw270 => "transpose=2".to_string(),
            RotationAngle::Custom { degrees } => {
                format!("rotate={}*(PI/180):bilinear=0", degrees)
            }
        }
    }

    /// Reject angles that cannot be encoded into a filter expression
    pub fn validate(&self) -> Result<(), RotationError> {
        match self {
            RotationAngle::Custom { degrees } if !degrees.is_finite() => {
                Err(RotationError::InvalidAngle(format!(
                    "custom angle {} is not finite",
                    degrees
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Output quality tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationQuality {
    #[default]
    Lossless,
    High,
    Medium,
    Low,
}

impl RotationQuality {
    /// CRF value for H.264 encoding.
    /// Lossless is CRF 0, matching the transposition-only intent of the
    /// quarter-turn filters.
    pub fn crf(&self) -> u8 {
        match self {
            RotationQuality::Lossless => 0,
            RotationQuality::High => 18,
            RotationQuality::Medium => 23,
            RotationQuality::Low => 28,
        }
    }

    /// FFmpeg preset for H.264 encoding
    pub fn h264_preset(&self) -> &'static str {
        match self {
            RotationQuality::Lossless => "ultrafast",
            RotationQuality::High => "slow",
            RotationQuality::Medium => "medium",
            RotationQuality::Low => "faster",
        }
    }
}

/// What to do when the derived output path already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Probe `<stem>_rotated-2`, `-3`, ... until a free name is found
    #[default]
    Rename,
    Replace,
    Skip,
}

/// Rotation job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationOptions {
    /// Rotation to apply to every input
    pub angle: RotationAngle,
    /// Output directory (None = the platform video directory + "rotated")
    pub output_dir: Option<String>,
    #[serde(default)]
    pub quality: RotationQuality,
    #[serde(default)]
    pub overwrite: OverwritePolicy,
    /// Copy the audio stream untouched instead of re-encoding it
    #[serde(default = "default_preserve_audio")]
    pub preserve_audio: bool,
}

fn default_preserve_audio() -> bool {
    true
}

/// Rotation progress stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum RotationStage {
    /// Validating inputs and resolving the toolchain
    Preparing,
    /// ffmpeg is running on a file
    Transcoding,
    /// All files processed, assembling the summary
    Finalizing,
    /// Job completed successfully
    Complete,
    /// Job failed with error
    Error { message: String },
}

/// Progress information for a batch rotation job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationProgress {
    /// Overall progress percentage (0.0 to 100.0)
    pub percent: f32,
    /// Current stage of the job
    pub stage: RotationStage,
    /// File currently being transcoded
    pub current_file: Option<String>,
    pub files_done: usize,
    pub files_total: usize,
}

impl RotationProgress {
    pub fn preparing(files_total: usize) -> Self {
        Self {
            percent: 0.0,
            stage: RotationStage::Preparing,
            current_file: None,
            files_done: 0,
            files_total,
        }
    }

    pub fn transcoding(
        current_file: String,
        file_fraction: f64,
        files_done: usize,
        files_total: usize,
    ) -> Self {
        Self {
            percent: overall_percent(files_done, files_total, file_fraction),
            stage: RotationStage::Transcoding,
            current_file: Some(current_file),
            files_done,
            files_total,
        }
    }

    pub fn finalizing(files_total: usize) -> Self {
        Self {
            percent: 99.0,
            stage: RotationStage::Finalizing,
            current_file: None,
            files_done: files_total,
            files_total,
        }
    }

    pub fn complete(files_total: usize) -> Self {
        Self {
            percent: 100.0,
            stage: RotationStage::Complete,
            current_file: None,
            files_done: files_total,
            files_total,
        }
    }

    pub fn error(message: String, files_done: usize, files_total: usize) -> Self {
        Self {
            percent: 0.0,
            stage: RotationStage::Error { message },
            current_file: None,
            files_done,
            files_total,
        }
    }
}

/// Completed files count fully; the current file contributes its fraction
pub(crate) fn overall_percent(files_done: usize, files_total: usize, file_fraction: f64) -> f32 {
    if files_total == 0 {
        return 0.0;
    }
    let fraction = (files_done as f64 + file_fraction.clamp(0.0, 1.0)) / files_total as f64;
    (fraction * 100.0).clamp(0.0, 100.0) as f32
}

/// Result of processing one input file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RotationOutcome {
    Completed { input: String, output: String },
    Skipped { input: String, reason: String },
}

/// Final report for a batch rotation job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSummary {
    pub job_id: Uuid,
    pub outcomes: Vec<RotationOutcome>,
    pub finished_at: DateTime<Utc>,
}

impl RotationSummary {
    pub fn completed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RotationOutcome::Completed { .. }))
            .count()
    }
}

/// Rotation errors
#[derive(Error, Debug)]
pub enum RotationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media error: {0}")]
    Media(#[from] crate::media::MediaError),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("invalid rotation angle: {0}")]
    InvalidAngle(String),

    #[error("no input files selected")]
    NoInputs,

    #[error("input not found: {0}")]
    InputNotFound(String),

    #[error("output directory error: {0}")]
    OutputDir(String),

    #[error("rotation cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_quarter_turns() {
        assert_eq!(RotationAngle::Cw90.filter(), "transpose=1");
        assert_eq!(RotationAngle::Cw180.filter(), "transpose=2,transpose=2");
        assert_eq!(RotationAngle::Cw270.filter(), "transpose=2");
    }

    #[test]
    fn test_filter_custom_angle() {
        let angle = RotationAngle::Custom { degrees: 45.0 };
        assert_eq!(angle.filter(), "rotate=45*(PI/180):bilinear=0");

        let angle = RotationAngle::Custom { degrees: 12.5 };
        assert_eq!(angle.filter(), "rotate=12.5*(PI/180):bilinear=0");
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(RotationAngle::Custom {
            degrees: f64::NAN
        }
        .validate()
        .is_err());
        assert!(RotationAngle::Custom {
            degrees: f64::INFINITY
        }
        .validate()
        .is_err());
        assert!(RotationAngle::Custom { degrees: -270.0 }.validate().is_ok());
        assert!(RotationAngle::Cw90.validate().is_ok());
    }

    #[test]
    fn test_quality_tiers() {
        assert_eq!(RotationQuality::Lossless.crf(), 0);
        assert_eq!(RotationQuality::Lossless.h264_preset(), "ultrafast");
        assert_eq!(RotationQuality::Medium.crf(), 23);
        assert_eq!(RotationQuality::Low.h264_preset(), "faster");
    }

    #[test]
    fn test_overall_percent() {
        assert_eq!(overall_percent(0, 0, 0.0), 0.0);
        assert_eq!(overall_percent(0, 2, 0.5), 25.0);
        assert_eq!(overall_percent(1, 2, 0.0), 50.0);
        assert_eq!(overall_percent(2, 2, 0.0), 100.0);
        // Fractions outside 0..1 are clamped
        assert_eq!(overall_percent(0, 1, 2.0), 100.0);
    }

    #[test]
    fn test_angle_serde_shape() {
        let json = serde_json::to_value(RotationAngle::Cw90).unwrap();
        assert_eq!(json, serde_json::json!({"type": "cw90"}));

        let parsed: RotationAngle =
            serde_json::from_value(serde_json::json!({"type": "custom", "degrees": 33.0})).unwrap();
        assert_eq!(parsed, RotationAngle::Custom { degrees: 33.0 });
    }
}

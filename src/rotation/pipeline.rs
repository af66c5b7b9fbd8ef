//! Batch rotation orchestration
//!
//! This module coordinates a full rotation job: toolchain resolution,
//! output naming, per-file transcoding, and progress aggregation.

use crate::media::{locate, probe};
use crate::rotation::naming;
use crate::rotation::transcode;
use crate::rotation::types::{
    RotationError, RotationOptions, RotationOutcome, RotationProgress, RotationSummary,
};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Batch rotation job
pub struct RotationPipeline {
    job_id: Uuid,
    inputs: Vec<PathBuf>,
    options: RotationOptions,
    cancel_flag: Arc<AtomicBool>,
}

impl RotationPipeline {
    /// Create a new rotation pipeline
    pub fn new(
        inputs: Vec<PathBuf>,
        options: RotationOptions,
        cancel_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            inputs,
            options,
            cancel_flag,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Run the job to completion, reporting progress through the callback
    pub fn run<F>(&self, progress_callback: F) -> Result<RotationSummary, RotationError>
    where
        F: Fn(RotationProgress) + Send,
    {
        let files_total = self.inputs.len();
        tracing::info!(
            "Starting rotation job {} for {} file(s)",
            self.job_id,
            files_total
        );

        if self.inputs.is_empty() {
            return Err(RotationError::NoInputs);
        }
        self.options.angle.validate()?;

        progress_callback(RotationProgress::preparing(files_total));

        let ffmpeg = locate::ffmpeg_path()?;
        let output_dir = self.resolve_output_dir()?;

        for input in &self.inputs {
            if !input.is_file() {
                return Err(RotationError::InputNotFound(
                    input.to_string_lossy().to_string(),
                ));
            }
        }

        let mut outcomes = Vec::with_capacity(files_total);

        for (index, input) in self.inputs.iter().enumerate() {
            if self.is_cancelled() {
                return Err(RotationError::Cancelled);
            }

            let Some(output) =
                naming::rotated_output_path(input, &output_dir, self.options.overwrite)?
            else {
                tracing::info!("Skipping {:?}: output already exists", input);
                outcomes.push(RotationOutcome::Skipped {
                    input: input.to_string_lossy().to_string(),
                    reason: "output already exists".to_string(),
                });
                continue;
            };

            if output == *input {
                return Err(RotationError::OutputDir(format!(
                    "output would overwrite the input: {:?}",
                    input
                )));
            }

            // Unknown duration degrades progress to file-count granularity
            let duration_ms = probe::video_duration_ms(input).unwrap_or_else(|e| {
                tracing::warn!("Duration probe failed for {:?}: {}", input, e);
                0
            });

            let display_name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| input.to_string_lossy().to_string());

            transcode::rotate_file(
                &ffmpeg,
                input,
                &output,
                &self.options,
                duration_ms,
                &self.cancel_flag,
                |fraction| {
                    progress_callback(RotationProgress::transcoding(
                        display_name.clone(),
                        fraction,
                        index,
                        files_total,
                    ));
                },
            )?;

            outcomes.push(RotationOutcome::Completed {
                input: input.to_string_lossy().to_string(),
                output: output.to_string_lossy().to_string(),
            });
        }

        progress_callback(RotationProgress::finalizing(files_total));

        let summary = RotationSummary {
            job_id: self.job_id,
            outcomes,
            finished_at: Utc::now(),
        };

        progress_callback(RotationProgress::complete(files_total));
        tracing::info!(
            "Rotation job {} complete: {}/{} file(s) rotated",
            self.job_id,
            summary.completed_count(),
            files_total
        );

        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Resolve and create the output directory
    fn resolve_output_dir(&self) -> Result<PathBuf, RotationError> {
        let dir = match &self.options.output_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => naming::default_output_dir()?,
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| RotationError::OutputDir(format!("cannot create {:?}: {}", dir, e)))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::types::{OverwritePolicy, RotationAngle, RotationQuality};
    use tempfile::tempdir;

    fn pipeline(inputs: Vec<PathBuf>, angle: RotationAngle, output_dir: Option<String>) -> RotationPipeline {
        RotationPipeline::new(
            inputs,
            RotationOptions {
                angle,
                output_dir,
                quality: RotationQuality::Lossless,
                overwrite: OverwritePolicy::Rename,
                preserve_audio: true,
            },
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn test_run_rejects_empty_inputs() {
        let p = pipeline(vec![], RotationAngle::Cw90, None);
        let err = p.run(|_| {}).unwrap_err();
        assert!(matches!(err, RotationError::NoInputs));
    }

    #[test]
    fn test_run_rejects_invalid_angle() {
        let p = pipeline(
            vec![PathBuf::from("clip.mp4")],
            RotationAngle::Custom {
                degrees: f64::NAN,
            },
            None,
        );
        let err = p.run(|_| {}).unwrap_err();
        assert!(matches!(err, RotationError::InvalidAngle(_)));
    }

    #[test]
    fn test_resolve_output_dir_creates_explicit_dir() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("out");
        let p = pipeline(
            vec![PathBuf::from("clip.mp4")],
            RotationAngle::Cw90,
            Some(target.to_string_lossy().to_string()),
        );

        let resolved = p.resolve_output_dir().unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_resolve_output_dir_ignores_blank_override() {
        let p = pipeline(
            vec![PathBuf::from("clip.mp4")],
            RotationAngle::Cw90,
            Some("   ".to_string()),
        );
        // Blank override falls through to the default directory
        let resolved = p.resolve_output_dir();
        if let Ok(dir) = resolved {
            assert!(dir.ends_with("rotated"));
        }
    }
}

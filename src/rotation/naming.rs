//! Output path derivation
//!
//! Rotated files land in a single output directory as
//! `<stem>_rotated.<ext>`, with conflicts handled by policy.

use crate::rotation::types::{OverwritePolicy, RotationError};
use std::path::{Path, PathBuf};

/// Suffix appended to the input file stem
const ROTATED_SUFFIX: &str = "_rotated";

/// Bound on rename probing before giving up
const MAX_RENAME_ATTEMPTS: u32 = 1000;

/// Default output directory: the platform video directory plus "rotated"
pub fn default_output_dir() -> Result<PathBuf, RotationError> {
    let base = dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .ok_or_else(|| RotationError::OutputDir("no home directory".to_string()))?;
    Ok(base.join("rotated"))
}

/// Derive the output path for one input under the given policy.
///
/// Returns `Ok(None)` when the policy is `Skip` and the derived path
/// already exists.
pub fn rotated_output_path(
    input: &Path,
    output_dir: &Path,
    policy: OverwritePolicy,
) -> Result<Option<PathBuf>, RotationError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| RotationError::OutputDir(format!("unusable input name: {:?}", input)))?;
    let ext = input.extension().and_then(|e| e.to_str());

    let first = output_dir.join(file_name(stem, None, ext));
    if !first.exists() {
        return Ok(Some(first));
    }

    match policy {
        OverwritePolicy::Replace => Ok(Some(first)),
        OverwritePolicy::Skip => Ok(None),
        OverwritePolicy::Rename => {
            for attempt in 2..MAX_RENAME_ATTEMPTS {
                let candidate = output_dir.join(file_name(stem, Some(attempt), ext));
                if !candidate.exists() {
                    return Ok(Some(candidate));
                }
            }
            Err(RotationError::OutputDir(format!(
                "no free output name for {:?} after {} attempts",
                input, MAX_RENAME_ATTEMPTS
            )))
        }
    }
}

fn file_name(stem: &str, attempt: Option<u32>, ext: Option<&str>) -> String {
    let mut name = match attempt {
        Some(n) => format!("{}{}-{}", stem, ROTATED_SUFFIX, n),
        None => format!("{}{}", stem, ROTATED_SUFFIX),
    };
    if let Some(ext) = ext {
        name.push('.');
        name.push_str(ext);
    }
    name
}

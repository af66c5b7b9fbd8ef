//! Transcoder binary discovery
//!
//! Resolves the ffmpeg and ffprobe executables. Resolution order: explicit
//! environment override, a bundled `ffmpeg/` directory next to the running
//! executable, then the bare command name resolved through PATH. A candidate
//! only counts as found if `-version` runs successfully.

use crate::media::MediaError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

const FFMPEG_ENV: &str = "CLIPTURN_FFMPEG";
const FFPROBE_ENV: &str = "CLIPTURN_FFPROBE";

/// Availability report for the external toolchain, shown in the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainStatus {
    pub ffmpeg_found: bool,
    pub ffmpeg_path: Option<String>,
    pub ffmpeg_version: Option<String>,
    pub ffprobe_found: bool,
    pub ffprobe_path: Option<String>,
    pub ffprobe_version: Option<String>,
}

/// Resolve the ffmpeg executable
pub fn ffmpeg_path() -> Result<PathBuf, MediaError> {
    resolve("ffmpeg", FFMPEG_ENV)
}

/// Resolve the ffprobe executable
pub fn ffprobe_path() -> Result<PathBuf, MediaError> {
    resolve("ffprobe", FFPROBE_ENV)
}

/// Build the toolchain availability report
pub fn toolchain_status() -> ToolchainStatus {
    let ffmpeg = ffmpeg_path().ok();
    let ffprobe = ffprobe_path().ok();

    let ffmpeg_version = ffmpeg.as_deref().and_then(|p| version_line(p).ok());
    let ffprobe_version = ffprobe.as_deref().and_then(|p| version_line(p).ok());

    ToolchainStatus {
        ffmpeg_found: ffmpeg.is_some(),
        ffmpeg_path: ffmpeg.map(|p| p.to_string_lossy().to_string()),
        ffmpeg_version,
        ffprobe_found: ffprobe.is_some(),
        ffprobe_path: ffprobe.map(|p| p.to_string_lossy().to_string()),
        ffprobe_version,
    }
}

fn resolve(binary: &str, env_var: &str) -> Result<PathBuf, MediaError> {
    for candidate in candidates(binary, env_var) {
        if runs(&candidate) {
            return Ok(candidate);
        }
    }

    Err(MediaError::ToolchainMissing(format!(
        "{} was not found; install FFmpeg and add it to PATH, or set {}",
        binary, env_var
    )))
}

/// Candidate locations in resolution order
fn candidates(binary: &str, env_var: &str) -> Vec<PathBuf> {
    let mut list = Vec::new();

    if let Ok(overridden) = std::env::var(env_var) {
        if !overridden.is_empty() {
            list.push(PathBuf::from(overridden));
        }
    }

    // Bundled layout: an `ffmpeg` directory next to the executable
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        list.push(exe_dir.join("ffmpeg").join(exe_name(binary)));
    }

    // PATH lookup is delegated to the OS
    list.push(PathBuf::from(binary));
    list
}

fn exe_name(binary: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", binary)
    } else {
        binary.to_string()
    }
}

/// A candidate counts as present only if `-version` runs and exits zero
fn runs(path: &Path) -> bool {
    Command::new(path)
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// First line of `<binary> -version`, e.g. "ffmpeg version 7.1 ..."
fn version_line(path: &Path) -> anyhow::Result<String> {
    let output = Command::new(path)
        .arg("-version")
        .output()
        .with_context(|| format!("failed to run {:?} -version", path))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .context("empty -version output")
}

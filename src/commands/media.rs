//! Media command handlers
//!
//! Probing input files and reporting external toolchain availability.

use crate::media::{locate, probe, ToolchainStatus, VideoMetadata};
use crate::rotation::naming;
use crate::utils::error::{AppResult, ErrorResponse};
use std::path::Path;

/// Probe a video file for the metadata shown in the file list
#[tauri::command]
pub async fn get_video_metadata(path: String) -> Result<VideoMetadata, ErrorResponse> {
    probe_file(&path).map_err(ErrorResponse::from)
}

fn probe_file(path: &str) -> AppResult<VideoMetadata> {
    let meta = probe::probe_video(Path::new(path))?;

    let (width, height) = meta.displayed_dimensions();
    tracing::debug!(
        "Probed {}: {}x{} as displayed, {:.1}s, {}",
        path,
        width,
        height,
        meta.duration_ms as f64 / 1000.0,
        meta.codec
    );

    Ok(meta)
}

/// Report ffmpeg/ffprobe availability and versions
#[tauri::command]
pub async fn check_toolchain() -> Result<ToolchainStatus, ErrorResponse> {
    Ok(locate::toolchain_status())
}

/// The directory rotated files land in when no override is set
#[tauri::command]
pub async fn get_default_output_dir() -> Result<String, ErrorResponse> {
    default_dir().map_err(ErrorResponse::from)
}

fn default_dir() -> AppResult<String> {
    let dir = naming::default_output_dir()?;
    Ok(dir.to_string_lossy().to_string())
}

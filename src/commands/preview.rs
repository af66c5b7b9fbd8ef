//! Preview command handlers

use crate::preview::{self, PreviewFrame};
use crate::rotation::RotationAngle;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tauri::State;

/// Tracks preview frames written to the temp directory, so only files this
/// app created can be deleted over IPC
#[derive(Default)]
pub struct PreviewState {
    frames: Mutex<Vec<PathBuf>>,
}

/// Render a rotated midpoint frame for the given file
#[tauri::command]
pub async fn render_preview(
    state: State<'_, PreviewState>,
    path: String,
    angle: RotationAngle,
) -> Result<PreviewFrame, String> {
    let frame = preview::render_preview(Path::new(&path), angle)
        .await
        .map_err(|e| e.to_string())?;

    state.frames.lock().push(PathBuf::from(&frame.image_path));
    Ok(frame)
}

/// Delete a preview frame created earlier in this session
#[tauri::command]
pub fn discard_preview(state: State<'_, PreviewState>, image_path: String) -> Result<(), String> {
    let target = PathBuf::from(&image_path);

    let mut frames = state.frames.lock();
    let Some(index) = frames.iter().position(|p| *p == target) else {
        return Err("Unknown preview image".to_string());
    };
    frames.remove(index);
    drop(frames);

    if let Err(e) = std::fs::remove_file(&target) {
        tracing::warn!("Failed to remove preview {:?}: {}", target, e);
    }
    Ok(())
}

//! Rotation command handlers
//!
//! This module provides Tauri commands for batch rotation jobs.

use crate::rotation::{RotationOptions, RotationPipeline};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};

/// State for tracking the active rotation job
#[derive(Default)]
pub struct RotationState {
    /// Cancel flag for the current job
    cancel_flag: Arc<AtomicBool>,
    /// Whether a job is currently running
    is_rotating: Arc<AtomicBool>,
}

/// Start a batch rotation job
///
/// This command starts the rotation in a background task and emits
/// progress events via Tauri's event system. Returns the job id.
#[tauri::command]
pub async fn start_rotation(
    app: AppHandle,
    state: State<'_, RotationState>,
    inputs: Vec<String>,
    options: RotationOptions,
) -> Result<String, String> {
    if inputs.is_empty() {
        return Err("No input files selected".to_string());
    }
    if state.is_rotating.load(Ordering::Relaxed) {
        return Err("A rotation is already in progress".to_string());
    }

    // Reset cancel flag
    state.cancel_flag.store(false, Ordering::Relaxed);
    state.is_rotating.store(true, Ordering::Relaxed);

    let cancel_flag = state.cancel_flag.clone();
    let is_rotating = state.is_rotating.clone();

    let pipeline = RotationPipeline::new(
        inputs.into_iter().map(PathBuf::from).collect(),
        options,
        cancel_flag,
    );
    let job_id = pipeline.job_id().to_string();

    tracing::info!("Starting rotation job {}", job_id);

    // Run the job in a background task
    tauri::async_runtime::spawn(async move {
        let app_handle = app.clone();
        let result = tokio::task::spawn_blocking(move || {
            pipeline.run(|progress| {
                // Emit progress event
                if let Err(e) = app_handle.emit("rotation-progress", &progress) {
                    tracing::warn!("Failed to emit rotation progress: {}", e);
                }
            })
        })
        .await;

        // Mark the job as finished
        is_rotating.store(false, Ordering::Relaxed);

        match result {
            Ok(Ok(summary)) => {
                tracing::info!(
                    "Rotation job finished: {}/{} file(s) rotated",
                    summary.completed_count(),
                    summary.outcomes.len()
                );
                if let Err(e) = app.emit("rotation-complete", &summary) {
                    tracing::warn!("Failed to emit rotation-complete: {}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Rotation failed: {}", e);
                if let Err(emit_err) = app.emit("rotation-error", e.to_string()) {
                    tracing::warn!("Failed to emit rotation-error: {}", emit_err);
                }
            }
            Err(e) => {
                tracing::error!("Rotation task panicked: {}", e);
                if let Err(emit_err) =
                    app.emit("rotation-error", format!("Rotation task panicked: {}", e))
                {
                    tracing::warn!("Failed to emit rotation-error: {}", emit_err);
                }
            }
        }
    });

    Ok(job_id)
}

/// Cancel the current rotation job
#[tauri::command]
pub fn cancel_rotation(state: State<'_, RotationState>) -> Result<(), String> {
    if !state.is_rotating.load(Ordering::Relaxed) {
        return Err("No rotation in progress".to_string());
    }

    tracing::info!("Cancelling rotation");
    state.cancel_flag.store(true, Ordering::Relaxed);
    Ok(())
}

/// Check whether a rotation job is currently running
#[tauri::command]
pub fn is_rotating(state: State<'_, RotationState>) -> bool {
    state.is_rotating.load(Ordering::Relaxed)
}

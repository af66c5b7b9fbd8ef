//! Clipturn - Lossless video rotation, made simple.
//!
//! This is the main library crate for the Clipturn application.
//! It provides the Tauri application setup and all backend functionality.

pub mod commands;
pub mod media;
pub mod preview;
pub mod rotation;
pub mod settings;
pub mod utils;

use commands::preview::PreviewState;
use commands::rotation::RotationState;
use commands::settings::SettingsState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipturn=debug,tauri=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Clipturn v{}", env!("CARGO_PKG_VERSION"));

    let toolchain = media::locate::toolchain_status();
    if toolchain.ffmpeg_found {
        tracing::info!(
            "FFmpeg found: {}",
            toolchain.ffmpeg_version.as_deref().unwrap_or("unknown version")
        );
    } else {
        tracing::warn!("FFmpeg not found; rotation is unavailable until it is installed");
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .manage(RotationState::default())
        .manage(PreviewState::default())
        .manage(SettingsState::load_or_default())
        .invoke_handler(tauri::generate_handler![
            // Rotation commands
            commands::rotation::start_rotation,
            commands::rotation::cancel_rotation,
            commands::rotation::is_rotating,
            // Media commands
            commands::media::get_video_metadata,
            commands::media::check_toolchain,
            commands::media::get_default_output_dir,
            // Preview commands
            commands::preview::render_preview,
            commands::preview::discard_preview,
            // Settings commands
            commands::settings::get_settings,
            commands::settings::update_settings,
            // System commands
            commands::system::get_system_info,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

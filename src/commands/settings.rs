//! Settings command handlers
//!
//! These commands read and persist the user preferences.

use crate::settings::{store, AppSettings};
use crate::utils::error::{AppResult, ErrorResponse};
use chrono::Utc;
use tauri::State;
use tokio::sync::Mutex;

/// Application state holding the active settings
pub struct SettingsState {
    pub settings: Mutex<AppSettings>,
}

impl SettingsState {
    /// Load persisted settings, falling back to defaults on first run or
    /// on an unreadable file
    pub fn load_or_default() -> Self {
        let settings = store::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        });
        Self {
            settings: Mutex::new(settings),
        }
    }
}

/// Current settings
#[tauri::command]
pub async fn get_settings(state: State<'_, SettingsState>) -> Result<AppSettings, ErrorResponse> {
    let settings = state.settings.lock().await;
    Ok(settings.clone())
}

/// Replace and persist the settings
#[tauri::command]
pub async fn update_settings(
    state: State<'_, SettingsState>,
    mut settings: AppSettings,
) -> Result<AppSettings, ErrorResponse> {
    settings.updated_at = Utc::now();

    persist(&settings).map_err(ErrorResponse::from)?;

    let mut current = state.settings.lock().await;
    *current = settings.clone();

    tracing::info!("Settings updated");
    Ok(settings)
}

fn persist(settings: &AppSettings) -> AppResult<()> {
    store::save(settings)?;
    Ok(())
}

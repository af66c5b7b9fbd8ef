//! Settings persistence
//!
//! Preferences live as pretty-printed JSON under the platform config
//! directory. A missing file reads as defaults so first runs need no setup.

use super::schema::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings storage errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no config directory on this platform")]
    NoConfigDir,
}

const SETTINGS_FILE: &str = "settings.json";

/// Path of the settings file under the platform config directory
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(base.join("clipturn").join(SETTINGS_FILE))
}

/// Load settings, falling back to defaults when the file does not exist yet
pub fn load() -> Result<AppSettings, SettingsError> {
    load_from(&settings_path()?)
}

/// Persist settings
pub fn save(settings: &AppSettings) -> Result<(), SettingsError> {
    save_to(settings, &settings_path()?)
}

pub fn load_from(path: &Path) -> Result<AppSettings, SettingsError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&content)?;

    tracing::debug!("Loaded settings from {:?}", path);

    Ok(settings)
}

pub fn save_to(settings: &AppSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)?;

    tracing::debug!("Saved settings to {:?}", path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::types::{OverwritePolicy, RotationQuality};
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = AppSettings::default();
        settings.output_dir = Some("/videos/out".to_string());
        settings.quality = RotationQuality::Medium;
        settings.overwrite = OverwritePolicy::Replace;
        settings.preserve_audio = false;

        save_to(&settings, &path).unwrap();
        let loaded = load_from(&path).unwrap();

        assert_eq!(loaded.output_dir.as_deref(), Some("/videos/out"));
        assert_eq!(loaded.quality, RotationQuality::Medium);
        assert_eq!(loaded.overwrite, OverwritePolicy::Replace);
        assert!(!loaded.preserve_audio);
    }

    #[test]
    fn test_missing_file_reads_as_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_from(&dir.path().join("settings.json")).unwrap();

        assert_eq!(loaded.output_dir, None);
        assert_eq!(loaded.quality, RotationQuality::Lossless);
        assert!(loaded.preserve_audio);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_from(&path),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"quality": "high"}"#).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.quality, RotationQuality::High);
        assert!(loaded.preserve_audio);
    }
}

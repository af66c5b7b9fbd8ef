//! Error types and handling
//!
//! Common error types used across the application.

use crate::media::MediaError;
use crate::rotation::types::RotationError;
use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("rotation error: {0}")]
    Rotation(#[from] RotationError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Error payload for the frontend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Media(_) => "MEDIA_ERROR",
            AppError::Rotation(_) => "ROTATION_ERROR",
            AppError::Settings(_) => "SETTINGS_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

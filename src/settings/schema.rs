//! Settings schema definitions
//!
//! These types match the payload the front-end reads and writes over IPC.

use crate::rotation::types::{OverwritePolicy, RotationQuality};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User preferences persisted between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Output directory override (None = platform default)
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub quality: RotationQuality,
    #[serde(default)]
    pub overwrite: OverwritePolicy,
    #[serde(default = "default_preserve_audio")]
    pub preserve_audio: bool,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_preserve_audio() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            quality: RotationQuality::default(),
            overwrite: OverwritePolicy::default(),
            preserve_audio: true,
            updated_at: Utc::now(),
        }
    }
}

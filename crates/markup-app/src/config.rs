//! Application configuration.

use markup_core::tools::ToolSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application configuration, loaded from JSON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Initial tool, color and stroke width.
    pub tool: ToolSettings,
    /// CSS color for the selected shape.
    pub highlight_color: String,
    /// Font used for text annotations.
    pub font_path: Option<PathBuf>,
    pub annotations_file: String,
    pub image_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool: ToolSettings::default(),
            highlight_color: "#3b82f6".to_string(),
            font_path: None,
            annotations_file: markup_core::storage::ANNOTATIONS_FILE_NAME.to_string(),
            image_file: markup_core::storage::IMAGE_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

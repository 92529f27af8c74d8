//! Configuration for the quillnotes application.
use std::{fs, path::Path, path::PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{QnError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Quiet period before an auto-save fires, in milliseconds
    pub autosave_delay_ms: u64,

    /// Whether to enable auto-saving in the editor
    pub autosave: bool,

    /// Maximum length of the content preview shown on note cards
    pub preview_length: usize,

    /// How many tags a note card shows before collapsing into "+N"
    pub card_tag_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 2000,
            autosave: true,
            preview_length: 150,
            card_tag_limit: 3,
        }
    }
}

impl Config {
    /// Loads configuration from the given path, or from the platform config
    /// directory when no path is given. Missing default-location files fall
    /// back to defaults; an explicitly named file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| QnError::ConfigError {
                    message: format!("Failed to read config file {}: {}", path.display(), e),
                })?;
                let config = serde_json::from_str(&content)?;
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    let content = fs::read_to_string(&path)?;
                    let config = serde_json::from_str(&content)?;
                    debug!("Loaded config from {}", path.display());
                    Ok(config)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quillnotes").join("config.json"))
    }
}

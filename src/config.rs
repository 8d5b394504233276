//! Highlight settings
//!
//! Stored in `~/.config/pathmark/settings.yaml`:
//!
//! ```yaml
//! highlight_urls: true
//! max_url_limit: 200
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Buffers with more matches than this are ignored until closed
pub const DEFAULT_MAX_URL_LIMIT: usize = 200;

/// User-tunable behaviour of the highlight engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Draw underlines. When off, matches are still tracked so
    /// open-under-cursor keeps working.
    #[serde(default = "default_highlight_urls")]
    pub highlight_urls: bool,

    /// Match-count ceiling per buffer
    #[serde(default = "default_max_url_limit")]
    pub max_url_limit: usize,
}

fn default_highlight_urls() -> bool {
    true
}

fn default_max_url_limit() -> usize {
    DEFAULT_MAX_URL_LIMIT
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            highlight_urls: default_highlight_urls(),
            max_url_limit: default_max_url_limit(),
        }
    }
}

impl HighlightSettings {
    /// Load settings from the config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using default settings");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load settings from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

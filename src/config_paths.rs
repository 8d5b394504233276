//! Centralized configuration paths for pathmark
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/pathmark/`
//! - Windows: `%APPDATA%\pathmark\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "pathmark";

/// Base config directory for pathmark
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/pathmark`
///   - Else: `~/.config/pathmark`
///
/// Windows:
///   - `%APPDATA%\pathmark`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/pathmark/settings.yaml`
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.yaml"))
}

/// `~/.config/pathmark/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| anyhow::anyhow!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(|| anyhow::anyhow!("No config directory available"))?;
    ensure_dir(&logs)?;
    Ok(logs)
}

//! Shared configuration directory helpers
//!
//! All nightprep components keep their settings as JSON files under a
//! single per-user directory (~/.config/nightprep/ on Linux). This
//! crate resolves that directory and reads/writes the files in it.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// The per-user nightprep config directory, if the platform has one
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nightprep"))
}

/// Path of a named file inside the config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Whether a named config file currently exists
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

/// Create the config directory if missing and return its path.
///
/// Applications call this once at startup; the read helpers below do
/// not create anything.
pub fn init() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Read and parse a JSON file from the config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Read and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Write a value as pretty-printed JSON into the config directory,
/// creating the directory if needed
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<()> {
    let path = init()?.join(filename);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

//! Backlog configuration persistence.
//!
//! Stores host preferences (asset root, escape introducer) as JSON at
//! `~/.local/share/dialogue-backlog/config.json`. Loaded once on startup;
//! saved on every change so the file is always current. The library itself
//! never reads this (hosts pass explicit values); the dump binary does.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file path.
fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dialogue-backlog")
        .join("config.json")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_escape() -> char {
    crate::markup::DEFAULT_ESCAPE
}

/// Persisted backlog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogConfig {
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    #[serde(default = "default_escape")]
    pub escape_char: char,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    path: PathBuf,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            escape_char: default_escape(),
            path: default_path(),
        }
    }
}

impl BacklogConfig {
    /// Load from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = default_path();
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        };
        config.path = path;
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(&self.path, json);
        }
    }
}

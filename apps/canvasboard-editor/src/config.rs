use std::path::PathBuf;

use canvasboard_sync::SyncConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the local storage directory.
pub const STORAGE_DIR_ENV: &str = "CANVASBOARD_STORAGE_DIR";
const DEFAULT_STORAGE_DIR: &str = ".canvasboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    pub storage_dir: PathBuf,
    pub sync: SyncConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            sync: SyncConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Self {
        let storage_dir = std::env::var(STORAGE_DIR_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        Self {
            storage_dir,
            sync: SyncConfig::from_env(),
        }
    }
}

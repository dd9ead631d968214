//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::object::DEFAULT_SHADOW_MAP_SIZE;
use crate::store::{FileStore, StoreError};

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    100
}

fn default_shadow_map_size() -> u32 {
    DEFAULT_SHADOW_MAP_SIZE
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Persist the scene after every object, material or light change
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Maximum number of history entries; 0 keeps everything
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Shadow map resolution for shadow-casting lights
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: u32,
    /// Write the mesh geometry kind into the persisted scene instead of
    /// relying on name inference at restore time
    #[serde(default)]
    pub persist_geometry_kind: bool,
    /// Scene store directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autosave: true,
            history_limit: default_history_limit(),
            shadow_map_size: DEFAULT_SHADOW_MAP_SIZE,
            persist_geometry_kind: false,
            store_dir: None,
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return defaults if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring invalid settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to the config dir, returning the file written
    pub fn save(&self) -> Result<PathBuf, StoreError> {
        let path = Self::config_path().ok_or(StoreError::NoDataDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(StoreError::Serialize)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// History capacity, `None` when unbounded
    pub fn history_capacity(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    /// File store at the configured directory, or the platform default
    pub fn file_store(&self) -> Result<FileStore, StoreError> {
        match &self.store_dir {
            Some(dir) => Ok(FileStore::new(dir)),
            None => FileStore::default_location(),
        }
    }
}

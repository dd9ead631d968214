//! Scene store: durable key-value persistence of the full scene
//!
//! The store is a single-writer, last-write-wins slot keyed by
//! [`shared::SCENE_KEY`]. Values are JSON documents.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use shared::{PersistedScene, SCENE_KEY};

/// Scene store errors
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not a valid scene document
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Scene could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No platform data directory could be determined
    #[error("No data directory available")]
    NoDataDir,
}

/// Durable storage of the persisted scene
pub trait SceneStore {
    /// Prepare the backing storage (create directories and the like)
    fn init(&mut self) -> Result<(), StoreError>;

    /// Read the stored scene; `None` when nothing was ever written
    fn get(&self) -> Result<Option<PersistedScene>, StoreError>;

    /// Replace the stored scene
    fn set(&mut self, scene: &PersistedScene) -> Result<(), StoreError>;
}

fn decode(json: &str) -> Result<PersistedScene, StoreError> {
    serde_json::from_str(json).map_err(StoreError::Parse)
}

fn encode(scene: &PersistedScene) -> Result<String, StoreError> {
    serde_json::to_string_pretty(scene).map_err(StoreError::Serialize)
}

/// In-memory store. Clones share the same backing map, so a test can keep a
/// handle and inspect what the scene wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under the scene key
    pub fn raw(&self) -> Option<String> {
        self.entries.borrow().get(SCENE_KEY).cloned()
    }

    /// Overwrite the scene key with arbitrary text
    pub fn insert_raw(&self, json: impl Into<String>) {
        self.entries
            .borrow_mut()
            .insert(SCENE_KEY.to_string(), json.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SceneStore for MemoryStore {
    fn init(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get(&self) -> Result<Option<PersistedScene>, StoreError> {
        self.entries
            .borrow()
            .get(SCENE_KEY)
            .map(|json| decode(json))
            .transpose()
    }

    fn set(&mut self, scene: &PersistedScene) -> Result<(), StoreError> {
        let json = encode(scene)?;
        self.entries.borrow_mut().insert(SCENE_KEY.to_string(), json);
        Ok(())
    }
}

/// Store backed by one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory
    pub fn default_location() -> Result<Self, StoreError> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| Self::new(dirs.data_dir()))
            .ok_or(StoreError::NoDataDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the scene document
    pub fn scene_path(&self) -> PathBuf {
        self.dir.join(format!("{SCENE_KEY}.json"))
    }
}

impl SceneStore for FileStore {
    fn init(&mut self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn get(&self) -> Result<Option<PersistedScene>, StoreError> {
        let path = self.scene_path();
        match std::fs::read_to_string(&path) {
            Ok(json) => decode(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, scene: &PersistedScene) -> Result<(), StoreError> {
        let json = encode(scene)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.scene_path(), json)?;
        tracing::debug!(
            "Wrote {} objects to {}",
            scene.objects.len(),
            self.scene_path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shared::{PersistedMaterial, PersistedObject};

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("scene-editor-store-{}", uuid::Uuid::new_v4()))
    }

    fn one_cube() -> PersistedScene {
        PersistedScene {
            objects: vec![PersistedObject::Mesh {
                id: 1,
                name: "Cube 1".to_string(),
                position: [0.0; 3],
                rotation: [0.0; 3],
                scale: [1.0; 3],
                material: PersistedMaterial {
                    color: 0x5f3dc4,
                    metalness: 0.3,
                    roughness: 0.4,
                    wireframe: false,
                },
                geometry: None,
            }],
        }
    }

    #[test]
    fn test_memory_store_empty() {
        let store = MemoryStore::new();
        assert!(store.get().unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set(&one_cube()).unwrap();
        store.set(&PersistedScene::default()).unwrap();
        assert_eq!(store.get().unwrap(), Some(PersistedScene::default()));
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let mut store = MemoryStore::new();
        let observer = store.clone();
        store.set(&one_cube()).unwrap();
        assert!(observer.raw().unwrap().contains("Cube 1"));
    }

    #[test]
    fn test_memory_store_malformed() {
        let store = MemoryStore::new();
        store.insert_raw("{ not json");
        assert!(matches!(store.get(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir();
        let mut store = FileStore::new(&dir);
        store.init().unwrap();
        assert!(store.get().unwrap().is_none());

        store.set(&one_cube()).unwrap();
        assert!(store.scene_path().exists());
        assert_eq!(store.get().unwrap(), Some(one_cube()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_malformed() {
        let dir = temp_dir();
        let mut store = FileStore::new(&dir);
        store.init().unwrap();
        std::fs::write(store.scene_path(), "[1, 2").unwrap();
        let err = store.get().unwrap_err();
        assert!(err.to_string().starts_with("Parse error"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

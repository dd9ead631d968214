//! Autosave/load functionality

use shared::PersistedScene;

use super::SceneState;
use crate::events::{Diagnostic, EditorEvent};
use crate::snapshot;
use crate::store::StoreError;

impl SceneState {
    /// Prepare the scene store
    pub fn init_store(&mut self) -> Result<(), StoreError> {
        self.store.init()
    }

    /// Persisted form of every recognized live object, in live order
    pub fn persisted_scene(&self) -> PersistedScene {
        let include_geometry = self.settings.persist_geometry_kind;
        PersistedScene {
            objects: self
                .objects
                .iter()
                .filter_map(|obj| snapshot::to_persisted(obj, include_geometry))
                .collect(),
        }
    }

    /// Write the scene to the store when persistence is enabled.
    ///
    /// Returns whether anything was written.
    pub fn persist(&mut self) -> Result<bool, StoreError> {
        if !self.settings.autosave {
            return Ok(false);
        }
        let scene = self.persisted_scene();
        self.store.set(&scene)?;
        tracing::trace!("Persisted {} objects", scene.objects.len());
        Ok(true)
    }

    /// Autosave reaction: persist, logging failures instead of raising them
    pub(crate) fn autosave(&mut self) {
        if let Err(e) = self.persist() {
            tracing::warn!("Autosave failed: {e}");
            self.bus
                .publish(EditorEvent::Diagnostic(Diagnostic::PersistFailed(
                    e.to_string(),
                )));
        }
    }

    /// Replace the live objects with the stored scene.
    ///
    /// Returns the number of objects restored; 0 when the store is empty.
    pub fn restore(&mut self) -> Result<usize, StoreError> {
        let Some(scene) = self.store.get()? else {
            tracing::debug!("Nothing to restore");
            return Ok(0);
        };
        Ok(self.load_persisted(&scene))
    }

    /// Replace the live objects with `scene` without recording history.
    ///
    /// Objects are rebuilt with fresh ids; entries that cannot be rebuilt are
    /// skipped. Publishes a single `SceneGraphChanged`.
    pub fn load_persisted(&mut self, scene: &PersistedScene) -> usize {
        for object in std::mem::take(&mut self.objects) {
            if self.history.references(object.id) {
                self.retained.insert(object.id, object);
            }
        }

        let shadow_map_size = self.settings.shadow_map_size;
        for entry in &scene.objects {
            let Some(mut object) = snapshot::from_persisted(entry, shadow_map_size) else {
                continue;
            };
            object.id = self.allocate_id();
            if object.is_light() {
                self.lights_created += 1;
            }
            self.objects.push(object);
        }

        tracing::info!(
            "Restored {} of {} persisted objects",
            self.objects.len(),
            scene.objects.len()
        );
        self.bus.publish(EditorEvent::SceneGraphChanged);
        self.objects.len()
    }
}

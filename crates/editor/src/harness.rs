//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps a `SceneState` backed by an in-memory store and records every event
//! published on its bus.

use std::cell::RefCell;
use std::rc::Rc;

use shared::{GeometryKind, ObjectId, PersistedScene};

use crate::events::{Channel, EditorEvent};
use crate::export::export_scene_json;
use crate::object::LightPreset;
use crate::state::scene::SceneState;
use crate::state::settings::EditorSettings;
use crate::store::{MemoryStore, SceneStore, StoreError};

/// Headless test harness: scene, shared memory store and event log
pub struct TestHarness {
    pub scene: SceneState,
    pub store: MemoryStore,
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self::attach(MemoryStore::new(), settings)
    }

    fn attach(store: MemoryStore, settings: EditorSettings) -> Self {
        let scene = SceneState::new(store.clone(), settings);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scene
            .bus()
            .subscribe_all(move |e| sink.borrow_mut().push(e.clone()));
        Self {
            scene,
            store,
            events,
        }
    }

    /// Fresh harness over the same store, restored from it, as after a
    /// restart of the editor
    pub fn reopen(&self) -> Result<Self, StoreError> {
        let mut harness = Self::attach(self.store.clone(), self.scene.settings().clone());
        harness.scene.restore()?;
        harness.clear_events();
        Ok(harness)
    }

    // ── Scene manipulation ────────────────────────────────────

    pub fn create_primitive(&mut self, geometry: GeometryKind) -> ObjectId {
        self.scene.create_primitive(geometry)
    }

    /// Create a cube and return its ID
    pub fn create_cube(&mut self) -> ObjectId {
        self.create_primitive(GeometryKind::Cube)
    }

    /// Create a sphere and return its ID
    pub fn create_sphere(&mut self) -> ObjectId {
        self.create_primitive(GeometryKind::Sphere)
    }

    pub fn create_light(&mut self, preset: LightPreset) -> ObjectId {
        self.scene.create_light(preset)
    }

    /// Remove an object by ID
    pub fn delete(&mut self, id: ObjectId) -> bool {
        self.scene.remove_object(id)
    }

    pub fn select(&mut self, id: ObjectId) {
        self.scene.select(Some(id));
    }

    pub fn clear_selection(&mut self) {
        self.scene.select(None);
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.scene.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.scene.redo()
    }

    pub fn new_scene(&mut self) {
        self.scene.new_scene();
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.scene.object_count()
    }

    /// Ids of live objects in outliner order
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.scene.objects().iter().map(|o| o.id()).collect()
    }

    /// Names of live objects in outliner order
    pub fn object_names(&self) -> Vec<String> {
        self.scene.objects().iter().map(|o| o.name.clone()).collect()
    }

    /// Scene currently held by the store
    pub fn stored_scene(&self) -> Result<Option<PersistedScene>, StoreError> {
        self.store.get()
    }

    /// Export the visible scene as JSON
    pub fn export_scene_json(&self) -> String {
        export_scene_json(&self.scene).unwrap_or_default()
    }

    // ── Events ────────────────────────────────────────────────

    /// Every event published since the last clear
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    /// Events published on one channel since the last clear
    pub fn events_on(&self, channel: Channel) -> Vec<EditorEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.channel() == channel)
            .cloned()
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

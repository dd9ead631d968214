//! Scene state management
//!
//! This module provides the scene graph manager: live objects, selection,
//! undo/redo history, environment and persistence.

mod display;
pub mod environment;
pub mod history;
pub mod material_ops;
mod object_ops;
mod persistence;
mod transform_ops;

use std::collections::{HashMap, HashSet};

pub use display::{kind_label, object_display_name, object_icon};
pub use history::{Action, HistoryLedger};

use shared::ObjectId;

use crate::events::{Diagnostic, EditorEvent, EventBus};
use crate::object::{EditableObject, ObjectKind, UNASSIGNED_ID};
use crate::state::settings::EditorSettings;
use crate::state::EditorMode;
use crate::store::{MemoryStore, SceneStore};

use environment::{Environment, EnvironmentPreset};

/// Scene graph with selection and undo/redo history
pub struct SceneState {
    /// Live objects in insertion order
    pub(crate) objects: Vec<EditableObject>,
    pub(crate) selected: Option<ObjectId>,
    pub(crate) history: HistoryLedger,
    /// Objects out of the live list that history may bring back
    pub(crate) retained: HashMap<ObjectId, EditableObject>,
    pub(crate) bus: EventBus,
    pub(crate) store: Box<dyn SceneStore>,
    pub(crate) settings: EditorSettings,
    pub(crate) environment: Environment,
    pub(crate) mode: EditorMode,
    pub(crate) viewport: (u32, u32),
    /// Renderer shadow switch, flipped by `toggle_shadows`
    pub(crate) shadows_enabled: bool,
    next_id: ObjectId,
    /// Ids handed out by `spawn` that have not been inserted yet
    spawned: HashSet<ObjectId>,
    /// Lights created through the light factory or restored, for naming
    pub(crate) lights_created: usize,
}

impl SceneState {
    /// Empty scene with the studio environment
    pub fn new(store: impl SceneStore + 'static, settings: EditorSettings) -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
            history: HistoryLedger::with_capacity(settings.history_capacity()),
            retained: HashMap::new(),
            bus: EventBus::new(),
            store: Box::new(store),
            settings,
            environment: Environment::from_preset(EnvironmentPreset::Studio),
            mode: EditorMode::default(),
            viewport: (0, 0),
            shadows_enabled: true,
            next_id: 1,
            spawned: HashSet::new(),
            lights_created: 0,
        }
    }

    /// Handle to the event bus; clone it to subscribe
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Live objects in outliner order
    pub fn objects(&self) -> &[EditableObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get a live object by ID
    pub fn get_object(&self, id: ObjectId) -> Option<&EditableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub(crate) fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut EditableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get_object(id).is_some()
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected
    }

    /// The selected object, if it is still live
    pub fn selected(&self) -> Option<&EditableObject> {
        self.selected.and_then(|id| self.get_object(id))
    }

    pub fn lights(&self) -> impl Iterator<Item = &EditableObject> {
        self.objects.iter().filter(|o| o.is_light())
    }

    pub fn meshes(&self) -> impl Iterator<Item = &EditableObject> {
        self.objects.iter().filter(|o| o.is_mesh())
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    /// Objects held for undo/redo outside the live list
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    /// Allocate a fresh object id; ids are never reused within a session
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build an object with a freshly allocated id, not yet in the scene
    pub fn spawn(&mut self, name: impl Into<String>, kind: ObjectKind) -> EditableObject {
        let id = self.allocate_id();
        self.spawned.insert(id);
        EditableObject::with_id(id, name, kind)
    }

    /// Give `object` an id that has never been used in this session.
    ///
    /// Ids from `spawn` are claimed once. Any other id below the allocator
    /// has been handed out before and is replaced.
    pub(crate) fn adopt_id(&mut self, object: &mut EditableObject) {
        if object.id != UNASSIGNED_ID && self.spawned.remove(&object.id) {
            return;
        }
        if object.id == UNASSIGNED_ID || object.id < self.next_id {
            object.id = self.allocate_id();
        } else {
            self.next_id = object.id + 1;
        }
    }

    /// Change the interaction mode
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        tracing::debug!("Mode changed to {}", mode.as_str());
        self.bus.publish(EditorEvent::ModeChanged(mode));
    }

    /// Record the viewport size
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.bus.publish(EditorEvent::WindowResize { width, height });
    }

    /// Publish a change notification, then run the autosave reaction for
    /// object, material and light changes.
    pub(crate) fn notify_change(&mut self, event: EditorEvent) {
        let autosaves = matches!(
            event,
            EditorEvent::ObjectChanged(_)
                | EditorEvent::MaterialChanged(_)
                | EditorEvent::LightChanged(_)
        );
        self.bus.publish(event);
        if autosaves {
            self.autosave();
        }
    }

    /// Report a lookup that found no object; state is left untouched
    pub(crate) fn lookup_missed(&self, object_id: ObjectId, operation: &'static str) {
        tracing::debug!("{operation}: object {object_id} not found");
        self.bus
            .publish(EditorEvent::Diagnostic(Diagnostic::LookupMissed {
                object_id,
                operation,
            }));
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(MemoryStore::new(), EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mesh_object;
    use shared::GeometryKind;

    #[test]
    fn test_new_scene_state() {
        let scene = SceneState::default();
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.selected_id(), None);
        assert_eq!(scene.mode(), EditorMode::Model);
        assert_eq!(scene.environment().preset, EnvironmentPreset::Studio);
        assert_eq!(scene.history().history_index(), -1);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut scene = SceneState::default();
        let a = scene.allocate_id();
        let b = scene.allocate_id();
        assert_ne!(a, b);
        assert_ne!(a, UNASSIGNED_ID);
    }

    #[test]
    fn test_adopt_id_resolves_collisions() {
        let mut scene = SceneState::default();
        let mut ahead = mesh_object("Cube 1", GeometryKind::Cube);
        ahead.id = 5;
        let id = scene.add_object(ahead.clone());
        assert_eq!(id, 5);
        let clash = scene.add_object(ahead);
        assert_ne!(clash, 5);
        let fresh = scene.allocate_id();
        assert!(fresh > clash);
    }

    #[test]
    fn test_released_id_is_not_adopted_again() {
        let mut scene = SceneState::default();
        let first = scene.create_primitive(GeometryKind::Cube);
        scene.remove_object(first);
        scene.reset_history();
        assert_eq!(scene.retained_count(), 0);

        let mut stale = mesh_object("Cube 1", GeometryKind::Cube);
        stale.id = first;
        let again = scene.add_object(stale);
        assert_ne!(first, again);
    }

    #[test]
    fn test_spawned_id_is_kept_once() {
        let mut scene = SceneState::default();
        let kind = mesh_object("Cube 1", GeometryKind::Cube).kind;
        let object = scene.spawn("Cube 1", kind);
        let spawned = object.id();
        assert_eq!(scene.add_object(object.clone()), spawned);
        scene.remove_object(spawned);
        assert_ne!(scene.add_object(object), spawned);
    }

    #[test]
    fn test_mode_and_resize_notify() {
        let mut scene = SceneState::default();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        scene.bus().subscribe_all(move |e| sink.borrow_mut().push(e.clone()));

        scene.set_mode(EditorMode::Rotate);
        scene.resize_viewport(800, 600);
        assert_eq!(
            *seen.borrow(),
            vec![
                EditorEvent::ModeChanged(EditorMode::Rotate),
                EditorEvent::WindowResize {
                    width: 800,
                    height: 600
                },
            ]
        );
        assert_eq!(scene.viewport(), (800, 600));
    }
}

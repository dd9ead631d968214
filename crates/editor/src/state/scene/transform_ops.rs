//! Transform and per-object property edits

use glam::Vec3;
use shared::ObjectId;

use super::SceneState;
use crate::events::EditorEvent;
use crate::object::{EditableObject, ObjectKind, Transform};
use crate::snapshot;

impl SceneState {
    /// Mutate an object through `f`, recording a `Modify` when its captured
    /// state changed. Does not notify. Returns false if `id` is not live.
    pub(crate) fn edit_object(
        &mut self,
        id: ObjectId,
        operation: &'static str,
        f: impl FnOnce(&mut EditableObject),
    ) -> bool {
        let Some(object) = self.get_object_mut(id) else {
            self.lookup_missed(id, operation);
            return false;
        };
        let before = snapshot::capture(object);
        f(object);
        let after = snapshot::capture(object);

        if let (Some(old_state), Some(new_state)) = (before, after) {
            if old_state != new_state {
                self.modify(id, old_state, new_state);
            }
        }
        true
    }

    /// Mutate an object, record the change and publish `ObjectChanged`
    pub fn update_object(&mut self, id: ObjectId, f: impl FnOnce(&mut EditableObject)) -> bool {
        let found = self.edit_object(id, "update object", f);
        if found {
            self.notify_change(EditorEvent::ObjectChanged(id));
        }
        found
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        self.update_object(id, |obj| obj.transform = transform)
    }

    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.update_object(id, |obj| obj.transform.position = position)
    }

    /// Euler angles in radians
    pub fn set_rotation(&mut self, id: ObjectId, rotation: Vec3) -> bool {
        self.update_object(id, |obj| obj.transform.rotation = rotation)
    }

    pub fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> bool {
        self.update_object(id, |obj| obj.transform.scale = scale)
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        self.update_object(id, |obj| obj.visible = visible)
    }

    pub fn set_cast_shadow(&mut self, id: ObjectId, cast_shadow: bool) -> bool {
        self.update_object(id, |obj| obj.cast_shadow = cast_shadow)
    }

    pub fn set_receive_shadow(&mut self, id: ObjectId, receive_shadow: bool) -> bool {
        self.update_object(id, |obj| obj.receive_shadow = receive_shadow)
    }

    /// Rename an object. Names are not part of history.
    pub fn rename(&mut self, id: ObjectId, name: impl Into<String>) -> bool {
        let Some(object) = self.get_object_mut(id) else {
            self.lookup_missed(id, "rename");
            return false;
        };
        object.name = name.into();
        self.notify_change(EditorEvent::ObjectChanged(id));
        true
    }

    /// Move the selected object to the origin
    pub fn center_selected(&mut self) -> bool {
        let Some(id) = self.selected().map(|o| o.id) else {
            return false;
        };
        self.set_position(id, Vec3::ZERO)
    }

    /// Flip shadow casting on meshes and non-ambient lights.
    ///
    /// Not recorded in history. Returns whether shadows are now enabled.
    pub fn toggle_shadows(&mut self) -> bool {
        let enabled = !self.shadows_enabled;
        self.shadows_enabled = enabled;

        let mut touched = Vec::new();
        for object in &mut self.objects {
            match &object.kind {
                ObjectKind::Mesh(_) => {
                    object.cast_shadow = enabled;
                    object.receive_shadow = enabled;
                }
                ObjectKind::Light(light) if light.kind.casts_shadows() => {
                    object.cast_shadow = enabled;
                }
                _ => continue,
            }
            touched.push(object.id);
        }
        for light in &mut self.environment.lights {
            if light.kind.casts_shadows() {
                light.cast_shadow = enabled;
            }
        }

        tracing::info!(
            "Shadows {}",
            if enabled { "enabled" } else { "disabled" }
        );
        for id in &touched {
            self.bus.publish(EditorEvent::ObjectChanged(*id));
        }
        if !touched.is_empty() {
            self.autosave();
        }
        enabled
    }
}

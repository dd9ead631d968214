//! Object creation, removal and selection

use glam::Vec3;
use shared::{GeometryKind, ObjectId, Snapshot};

use super::environment::EnvironmentPreset;
use super::{Action, SceneState};
use crate::events::EditorEvent;
use crate::object::{
    EditableObject, ImportedModel, Light, LightPreset, Material, Mesh, ObjectKind,
};

impl SceneState {
    /// Append an object to the live list and record it.
    ///
    /// A missing or colliding id is replaced by a fresh one. Returns the id
    /// the object ended up with.
    pub fn add_object(&mut self, mut object: EditableObject) -> ObjectId {
        self.adopt_id(&mut object);
        let id = object.id;
        tracing::debug!("Adding object {id} '{}'", object.name);
        self.objects.push(object);
        self.record(Action::Add { object_id: id });
        self.bus.publish(EditorEvent::ObjectAdded(id));
        id
    }

    /// Remove an object from the live list and record it.
    ///
    /// The action and notification happen even when `id` is not live. The
    /// selection is left alone. Returns whether a live object was removed.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let removed = match self.objects.iter().position(|o| o.id == id) {
            Some(index) => {
                let object = self.objects.remove(index);
                tracing::debug!("Removing object {id} '{}'", object.name);
                self.retained.insert(id, object);
                true
            }
            None => {
                tracing::debug!("Removing object {id} which is not in the scene");
                false
            }
        };
        self.record(Action::Remove { object_id: id });
        self.bus.publish(EditorEvent::ObjectRemoved(id));
        removed
    }

    /// Set or clear the selection
    pub fn select(&mut self, id: Option<ObjectId>) {
        self.selected = id;
        self.bus.publish(EditorEvent::ObjectSelected(id));
    }

    /// Record a modification the caller already performed
    pub fn modify(&mut self, id: ObjectId, old_state: Snapshot, new_state: Snapshot) {
        self.record(Action::Modify {
            object_id: id,
            old_state,
            new_state,
        });
    }

    /// Create a primitive mesh with the default material, add and select it
    pub fn create_primitive(&mut self, geometry: GeometryKind) -> ObjectId {
        let name = format!("{} {}", geometry.label(), self.objects.len() + 1);
        let mut object = self.spawn(
            name,
            ObjectKind::Mesh(Mesh {
                geometry,
                material: Material::default(),
            }),
        );
        object.cast_shadow = true;
        object.receive_shadow = true;

        let id = self.add_object(object);
        self.select(Some(id));
        id
    }

    /// Create a light from a preset, add and select it
    pub fn create_light(&mut self, preset: LightPreset) -> ObjectId {
        let (light, position) = Light::from_preset(preset);
        let name = format!("{} Light {}", light.kind.label(), self.lights_created + 1);
        let object = self.light_object(name, light, position);
        self.lights_created += 1;

        let id = self.add_object(object);
        self.select(Some(id));
        id
    }

    fn light_object(&mut self, name: String, mut light: Light, position: Vec3) -> EditableObject {
        light.shadow_map_size = self.settings.shadow_map_size;
        let casts = light.kind.casts_shadows();
        let mut object = self.spawn(name, ObjectKind::Light(light)).at(position);
        object.cast_shadow = casts;
        object
    }

    /// Insert an imported model
    pub fn import_model(&mut self, model: ImportedModel) -> ObjectId {
        let name = model
            .source
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&model.source)
            .to_string();
        tracing::info!("Importing model '{name}' ({} meshes)", model.mesh_count);
        let object = self.spawn(name, ObjectKind::Model(model));
        self.add_object(object)
    }

    /// Copy the selected object next to it and select the copy
    pub fn duplicate_selected(&mut self) -> Option<ObjectId> {
        let source = self.selected()?.clone();
        let name = format!("{} (Copy)", source.name);
        let position = source.transform.position + Vec3::X;

        let copy = match &source.kind {
            ObjectKind::Light(light) => {
                let mut light = Light::new(light.kind, light.color, light.intensity);
                light.shadow_map_size = self.settings.shadow_map_size;
                let mut copy = self.spawn(name, ObjectKind::Light(light)).at(position);
                copy.cast_shadow = source.cast_shadow;
                self.lights_created += 1;
                copy
            }
            ObjectKind::Mesh(_) | ObjectKind::Model(_) => {
                let mut copy = self.spawn(name, source.kind.clone());
                copy.transform = source.transform;
                copy.transform.position = position;
                copy.visible = source.visible;
                copy.cast_shadow = source.cast_shadow;
                copy.receive_shadow = source.receive_shadow;
                copy
            }
        };

        let id = self.add_object(copy);
        self.select(Some(id));
        Some(id)
    }

    /// Remove the selected object and clear the selection
    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        let id = self.selected()?.id;
        self.remove_object(id);
        self.select(None);
        Some(id)
    }

    /// Remove every object, forget history and restore the studio lighting
    pub fn new_scene(&mut self) {
        tracing::info!("New scene ({} objects removed)", self.objects.len());
        while let Some(id) = self.objects.first().map(|o| o.id) {
            self.remove_object(id);
        }
        self.reset_history();
        self.lights_created = 0;
        self.set_environment(EnvironmentPreset::Studio);
        self.select(None);
    }
}

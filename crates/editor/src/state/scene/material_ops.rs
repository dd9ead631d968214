//! Material and light property edits

use serde::{Deserialize, Serialize};
use shared::{MaterialKind, ObjectId};

use super::SceneState;
use crate::events::EditorEvent;
use crate::object::LightKind;

/// Partial material update; absent fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPatch {
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub metalness: Option<f32>,
    #[serde(default)]
    pub roughness: Option<f32>,
    #[serde(default)]
    pub wireframe: Option<bool>,
}

/// Partial light update; spot fields only apply to spot lights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightPatch {
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub intensity: Option<f32>,
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub penumbra: Option<f32>,
}

impl SceneState {
    /// Update a mesh material. Returns false if `id` is not a live mesh.
    pub fn set_material(&mut self, id: ObjectId, patch: MaterialPatch) -> bool {
        if !self.get_object(id).is_some_and(|o| o.is_mesh()) {
            self.lookup_missed(id, "set material");
            return false;
        }
        self.edit_object(id, "set material", |obj| {
            if let Some(mesh) = obj.as_mesh_mut() {
                let material = &mut mesh.material;
                if let Some(color) = patch.color {
                    material.set_color(color);
                }
                if let Some(metalness) = patch.metalness {
                    material.set_metalness(metalness);
                }
                if let Some(roughness) = patch.roughness {
                    material.set_roughness(roughness);
                }
                if let Some(wireframe) = patch.wireframe {
                    material.wireframe = wireframe;
                }
            }
        });
        self.bus.publish(EditorEvent::ObjectChanged(id));
        self.notify_change(EditorEvent::MaterialChanged(id));
        true
    }

    /// Switch the runtime material type of a mesh.
    ///
    /// Not recorded: history restores only the color across a type change.
    pub fn set_material_kind(&mut self, id: ObjectId, kind: MaterialKind) -> bool {
        let Some(mesh) = self.get_object_mut(id).and_then(|o| o.as_mesh_mut()) else {
            self.lookup_missed(id, "set material kind");
            return false;
        };
        mesh.material.kind = kind;
        self.notify_change(EditorEvent::MaterialChanged(id));
        true
    }

    /// Update a light. Returns false if `id` is not a live light.
    pub fn set_light(&mut self, id: ObjectId, patch: LightPatch) -> bool {
        if !self.get_object(id).is_some_and(|o| o.is_light()) {
            self.lookup_missed(id, "set light");
            return false;
        }
        self.edit_object(id, "set light", |obj| {
            if let Some(light) = obj.as_light_mut() {
                if let Some(color) = patch.color {
                    light.set_color(color);
                }
                if let Some(intensity) = patch.intensity {
                    light.set_intensity(intensity);
                }
                if let LightKind::Spot { angle, penumbra } = light.kind {
                    light.kind = LightKind::spot(
                        patch.angle.unwrap_or(angle),
                        patch.penumbra.unwrap_or(penumbra),
                    );
                }
            }
        });
        self.bus.publish(EditorEvent::ObjectChanged(id));
        self.notify_change(EditorEvent::LightChanged(id));
        true
    }
}

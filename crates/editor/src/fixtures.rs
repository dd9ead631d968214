//! Factory functions for creating test data.
//!
//! Provides helpers to construct `EditableObject`s, persisted entries and
//! scenes used in tests and by the command runner.

use shared::*;

use crate::object::{
    EditableObject, ImportedModel, Light, LightPreset, Material, Mesh, ObjectKind,
};

// ── Live object factories ───────────────────────────────────────

/// Detached mesh with the default material; the scene assigns its id
pub fn mesh_object(name: &str, geometry: GeometryKind) -> EditableObject {
    EditableObject::detached(
        name,
        ObjectKind::Mesh(Mesh {
            geometry,
            material: Material::default(),
        }),
    )
}

/// Light with the preset's defaults
pub fn light_object(name: &str, preset: LightPreset) -> EditableObject {
    let (light, position) = Light::from_preset(preset);
    EditableObject::detached(name, ObjectKind::Light(light)).at(position)
}

/// Imported model, which the snapshot codec does not recognize
pub fn model_object(name: &str) -> EditableObject {
    EditableObject::detached(
        name,
        ObjectKind::Model(ImportedModel {
            source: format!("{name}.glb"),
            mesh_count: 1,
        }),
    )
}

// ── Persisted entry factories ───────────────────────────────────

/// Persisted mesh at the origin with the default material
pub fn persisted_mesh(id: ObjectId, name: &str) -> PersistedObject {
    persisted_mesh_at(id, name, [0.0; 3])
}

/// Persisted mesh at a specific position
pub fn persisted_mesh_at(id: ObjectId, name: &str, pos: [f32; 3]) -> PersistedObject {
    PersistedObject::Mesh {
        id,
        name: name.to_string(),
        position: pos,
        rotation: [0.0; 3],
        scale: [1.0; 3],
        material: PersistedMaterial {
            color: 0x5f3dc4,
            metalness: 0.3,
            roughness: 0.4,
            wireframe: false,
        },
        geometry: None,
    }
}

/// Persisted light of an arbitrary `lightType` tag
pub fn persisted_light(id: ObjectId, name: &str, light_type: &str) -> PersistedObject {
    PersistedObject::Light {
        id,
        light_type: light_type.to_string(),
        name: name.to_string(),
        position: [1.0, 2.0, 3.0],
        color: 0xffffff,
        intensity: 1.0,
        angle: None,
        penumbra: None,
    }
}

// ── Scene factories ─────────────────────────────────────────────

/// Wrap entries in a persisted scene
pub fn persisted_scene(objects: Vec<PersistedObject>) -> PersistedScene {
    PersistedScene { objects }
}

/// One mesh of every geometry, named after it
pub fn persisted_all_primitives() -> PersistedScene {
    persisted_scene(
        GeometryKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                persisted_mesh_at(i as ObjectId + 1, &format!("{} {}", kind.label(), i + 1), [i as f32, 0.0, 0.0])
            })
            .collect(),
    )
}

/// A cube, a point light and a spot light
pub fn persisted_lit_scene() -> PersistedScene {
    persisted_scene(vec![
        persisted_mesh(1, "Cube 1"),
        persisted_light(2, "Point Light 1", "pointlight"),
        persisted_light(3, "Spot Light 2", "spotlight"),
    ])
}

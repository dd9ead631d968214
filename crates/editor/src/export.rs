//! Scene export
//!
//! Read-only enumeration of the visible live objects into a JSON document
//! that an external encoder (glTF or similar) can consume.

use serde::Serialize;
use shared::{GeometryKind, LightType, MaterialKind, ObjectId};

use crate::object::{EditableObject, ObjectKind};
use crate::state::{EnvironmentPreset, SceneState};

/// Exported material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedMaterial {
    pub kind: MaterialKind,
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub wireframe: bool,
}

/// Variant payload of an exported node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportedKind {
    Mesh {
        geometry: GeometryKind,
        material: ExportedMaterial,
    },
    Light {
        #[serde(rename = "lightType")]
        light_type: LightType,
        color: u32,
        intensity: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        angle: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        penumbra: Option<f32>,
    },
    Model {
        source: String,
        mesh_count: usize,
    },
}

/// One exported node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedObject {
    pub id: ObjectId,
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    #[serde(flatten)]
    pub kind: ExportedKind,
}

/// Exported scene document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedScene {
    pub environment: EnvironmentPreset,
    pub background: u32,
    pub objects: Vec<ExportedObject>,
}

fn export_object(object: &EditableObject) -> ExportedObject {
    let kind = match &object.kind {
        ObjectKind::Mesh(mesh) => ExportedKind::Mesh {
            geometry: mesh.geometry,
            material: ExportedMaterial {
                kind: mesh.material.kind,
                color: mesh.material.color,
                metalness: mesh.material.metalness,
                roughness: mesh.material.roughness,
                wireframe: mesh.material.wireframe,
            },
        },
        ObjectKind::Light(light) => {
            let spot = light.kind.spot_params();
            ExportedKind::Light {
                light_type: light.kind.light_type(),
                color: light.color,
                intensity: light.intensity,
                angle: spot.map(|(angle, _)| angle),
                penumbra: spot.map(|(_, penumbra)| penumbra),
            }
        }
        ObjectKind::Model(model) => ExportedKind::Model {
            source: model.source.clone(),
            mesh_count: model.mesh_count,
        },
    };
    ExportedObject {
        id: object.id(),
        name: object.name.clone(),
        position: object.transform.position.to_array(),
        rotation: object.transform.rotation.to_array(),
        scale: object.transform.scale.to_array(),
        cast_shadow: object.cast_shadow,
        receive_shadow: object.receive_shadow,
        kind,
    }
}

/// Enumerate the visible objects of `scene`
pub fn export_scene(scene: &SceneState) -> ExportedScene {
    let environment = scene.environment();
    ExportedScene {
        environment: environment.preset,
        background: environment.background,
        objects: scene
            .objects()
            .iter()
            .filter(|o| o.visible)
            .map(export_object)
            .collect(),
    }
}

/// Export `scene` as pretty-printed JSON
pub fn export_scene_json(scene: &SceneState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_scene(scene))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ImportedModel, LightPreset};

    #[test]
    fn test_export_empty() {
        let scene = SceneState::default();
        let exported = export_scene(&scene);
        assert!(exported.objects.is_empty());
        assert_eq!(exported.background, 0x111111);
    }

    #[test]
    fn test_hidden_objects_excluded() {
        let mut scene = SceneState::default();
        let a = scene.create_primitive(GeometryKind::Cube);
        let b = scene.create_primitive(GeometryKind::Sphere);
        scene.set_visible(a, false);

        let exported = export_scene(&scene);
        assert_eq!(exported.objects.len(), 1);
        assert_eq!(exported.objects[0].id, b);
    }

    #[test]
    fn test_export_json_tags() {
        let mut scene = SceneState::default();
        scene.create_light(LightPreset::Spot);
        scene.import_model(ImportedModel {
            source: "tree.gltf".to_string(),
            mesh_count: 3,
        });

        let json = export_scene_json(&scene).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["environment"], "studio");
        assert_eq!(value["objects"][0]["type"], "light");
        assert_eq!(value["objects"][0]["lightType"], "spotlight");
        assert!(value["objects"][0]["angle"].is_number());
        assert_eq!(value["objects"][1]["type"], "model");
        assert_eq!(value["objects"][1]["mesh_count"], 3);
    }
}

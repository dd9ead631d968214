//! State snapshot codec
//!
//! Converts live objects to and from immutable, type-tagged [`Snapshot`]
//! records (history payloads) and [`PersistedObject`] entries (scene store).

use glam::Vec3;
use shared::{
    GeometryKind, LightType, MaterialSnapshot, PersistedMaterial, PersistedObject, Snapshot,
};

use crate::events::{EditorEvent, EventBus};
use crate::object::{EditableObject, Light, LightKind, Material, Mesh, ObjectKind, Transform};

/// Capture the mutable fields of `object`.
///
/// Returns `None` for variants the codec does not recognize (imported models).
pub fn capture(object: &EditableObject) -> Option<Snapshot> {
    let t = &object.transform;
    match &object.kind {
        ObjectKind::Mesh(mesh) => Some(Snapshot::Mesh {
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            visible: object.visible,
            cast_shadow: object.cast_shadow,
            receive_shadow: object.receive_shadow,
            material: MaterialSnapshot {
                kind: mesh.material.kind,
                color: mesh.material.color,
                metalness: mesh.material.metalness,
                roughness: mesh.material.roughness,
                wireframe: mesh.material.wireframe,
            },
        }),
        ObjectKind::Light(light) => {
            let spot = light.kind.spot_params();
            Some(Snapshot::Light {
                light_type: light.kind.light_type(),
                position: t.position.to_array(),
                rotation: t.rotation.to_array(),
                visible: object.visible,
                cast_shadow: object.cast_shadow,
                color: light.color,
                intensity: light.intensity,
                angle: spot.map(|(angle, _)| angle),
                penumbra: spot.map(|(_, penumbra)| penumbra),
            })
        }
        ObjectKind::Model(_) => None,
    }
}

/// Write every field of `snapshot` onto `object`, without notifying.
///
/// A mesh whose material type differs from the snapshot's only gets its
/// color back; the material type itself is never changed here. A snapshot of
/// the other variant only restores the fields both variants share.
pub fn write(object: &mut EditableObject, snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Mesh {
            position,
            rotation,
            scale,
            visible,
            cast_shadow,
            receive_shadow,
            material,
        } => {
            object.transform.position = Vec3::from_array(*position);
            object.transform.rotation = Vec3::from_array(*rotation);
            object.visible = *visible;
            object.cast_shadow = *cast_shadow;

            if let ObjectKind::Mesh(mesh) = &mut object.kind {
                object.transform.scale = Vec3::from_array(*scale);
                object.receive_shadow = *receive_shadow;

                let live = &mut mesh.material;
                live.set_color(material.color);
                if live.kind == material.kind {
                    live.set_metalness(material.metalness);
                    live.set_roughness(material.roughness);
                    live.wireframe = material.wireframe;
                }
            }
        }
        Snapshot::Light {
            light_type,
            position,
            rotation,
            visible,
            cast_shadow,
            color,
            intensity,
            angle,
            penumbra,
        } => {
            object.transform.position = Vec3::from_array(*position);
            object.transform.rotation = Vec3::from_array(*rotation);
            object.visible = *visible;
            object.cast_shadow = *cast_shadow;

            if let ObjectKind::Light(light) = &mut object.kind {
                light.set_color(*color);
                light.set_intensity(*intensity);
                if let (LightType::SpotLight, LightKind::Spot { .. }) = (light_type, light.kind) {
                    let (live_angle, live_penumbra) =
                        light.kind.spot_params().unwrap_or_default();
                    light.kind = LightKind::spot(
                        angle.unwrap_or(live_angle),
                        penumbra.unwrap_or(live_penumbra),
                    );
                }
            }
        }
    }
}

/// Write `snapshot` onto `object` and publish `ObjectChanged` once.
///
/// No-op when either side is absent. Returns whether anything was applied.
pub fn apply(
    object: Option<&mut EditableObject>,
    snapshot: Option<&Snapshot>,
    bus: &EventBus,
) -> bool {
    let (Some(object), Some(snapshot)) = (object, snapshot) else {
        return false;
    };
    write(object, snapshot);
    bus.publish(EditorEvent::ObjectChanged(object.id));
    true
}

/// Persisted form of `object`, or `None` for unrecognized variants.
///
/// Mesh geometry is written explicitly only when `include_geometry` is set;
/// otherwise restore has to infer it from the name.
pub fn to_persisted(object: &EditableObject, include_geometry: bool) -> Option<PersistedObject> {
    let t = &object.transform;
    match &object.kind {
        ObjectKind::Mesh(mesh) => Some(PersistedObject::Mesh {
            id: object.id,
            name: object.name.clone(),
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            material: PersistedMaterial {
                color: mesh.material.color,
                metalness: mesh.material.metalness,
                roughness: mesh.material.roughness,
                wireframe: mesh.material.wireframe,
            },
            geometry: include_geometry.then_some(mesh.geometry),
        }),
        ObjectKind::Light(light) => {
            let spot = light.kind.spot_params();
            Some(PersistedObject::Light {
                id: object.id,
                light_type: light.kind.light_type().as_str().to_string(),
                name: object.name.clone(),
                position: t.position.to_array(),
                color: light.color,
                intensity: light.intensity,
                angle: spot.map(|(angle, _)| angle),
                penumbra: spot.map(|(_, penumbra)| penumbra),
            })
        }
        ObjectKind::Model(_) => None,
    }
}

/// Rebuild a detached object from a persisted entry.
///
/// Returns `None` for unknown entry types and unknown light types. The
/// result carries no id; the scene assigns a fresh one on insertion.
pub fn from_persisted(entry: &PersistedObject, shadow_map_size: u32) -> Option<EditableObject> {
    match entry {
        PersistedObject::Mesh {
            name,
            position,
            rotation,
            scale,
            material,
            geometry,
            ..
        } => {
            let geometry = geometry.unwrap_or_else(|| GeometryKind::infer_from_name(name));
            let mut live = Material::standard(material.color, material.metalness, material.roughness);
            live.wireframe = material.wireframe;

            let mut object = EditableObject::detached(
                name.clone(),
                ObjectKind::Mesh(Mesh {
                    geometry,
                    material: live,
                }),
            );
            object.transform = Transform {
                position: Vec3::from_array(*position),
                rotation: Vec3::from_array(*rotation),
                scale: Vec3::from_array(*scale),
            };
            object.cast_shadow = true;
            object.receive_shadow = true;
            Some(object)
        }
        PersistedObject::Light {
            light_type,
            name,
            position,
            color,
            intensity,
            angle,
            penumbra,
            ..
        } => {
            let Some(ty) = LightType::from_type_str(light_type) else {
                tracing::debug!("Skipping persisted light '{name}' of unknown type '{light_type}'");
                return None;
            };
            let kind = LightKind::from_light_type(ty, *angle, *penumbra);
            let mut light = Light::new(kind, *color, *intensity);
            light.shadow_map_size = shadow_map_size;

            let mut object =
                EditableObject::detached(name.clone(), ObjectKind::Light(light)).at(Vec3::from_array(*position));
            object.cast_shadow = kind.casts_shadows();
            Some(object)
        }
        PersistedObject::Unknown => {
            tracing::debug!("Skipping persisted entry of unknown type");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use shared::MaterialKind;

    use super::*;
    use crate::events::Channel;
    use crate::fixtures::{light_object, mesh_object, model_object};
    use crate::object::LightPreset;

    #[test]
    fn test_capture_mesh() {
        let mut obj = mesh_object("Cube 1", GeometryKind::Cube);
        obj.transform.position = Vec3::new(1.0, 2.0, 3.0);
        match capture(&obj).unwrap() {
            Snapshot::Mesh { position, scale, material, .. } => {
                assert_eq!(position, [1.0, 2.0, 3.0]);
                assert_eq!(scale, [1.0, 1.0, 1.0]);
                assert_eq!(material.kind, MaterialKind::Standard);
            }
            _ => panic!("Expected Mesh snapshot"),
        }
    }

    #[test]
    fn test_capture_does_not_alias_live_object() {
        let mut obj = mesh_object("Cube 1", GeometryKind::Cube);
        let snap = capture(&obj).unwrap();
        obj.transform.position.x = 42.0;
        assert_eq!(snap.position(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_capture_spot_light() {
        let obj = light_object("Spot Light 1", LightPreset::Spot);
        match capture(&obj).unwrap() {
            Snapshot::Light { light_type, angle, penumbra, .. } => {
                assert_eq!(light_type, LightType::SpotLight);
                assert!(angle.is_some());
                assert!(penumbra.is_some());
            }
            _ => panic!("Expected Light snapshot"),
        }
    }

    #[test]
    fn test_capture_unrecognized_variant() {
        let obj = model_object("Imported");
        assert!(capture(&obj).is_none());
        assert!(to_persisted(&obj, true).is_none());
    }

    #[test]
    fn test_write_restores_all_fields() {
        let mut obj = mesh_object("Cube 1", GeometryKind::Cube);
        let before = capture(&obj).unwrap();

        obj.transform.position = Vec3::new(5.0, 0.0, 0.0);
        obj.transform.scale = Vec3::splat(2.0);
        obj.visible = false;
        if let Some(mesh) = obj.as_mesh_mut() {
            mesh.material.set_color(0x00ff00);
            mesh.material.set_roughness(0.9);
            mesh.material.wireframe = true;
        }

        write(&mut obj, &before);
        assert_eq!(capture(&obj).unwrap(), before);
    }

    #[test]
    fn test_write_material_type_mismatch_restores_color_only() {
        let mut obj = mesh_object("Cube 1", GeometryKind::Cube);
        let before = capture(&obj).unwrap();

        if let Some(mesh) = obj.as_mesh_mut() {
            mesh.material.kind = MaterialKind::Basic;
            mesh.material.set_color(0x00ff00);
            mesh.material.set_metalness(0.9);
        }

        write(&mut obj, &before);
        let mesh = obj.as_mesh().unwrap();
        assert_eq!(mesh.material.kind, MaterialKind::Basic);
        assert_eq!(mesh.material.color, 0x5f3dc4);
        assert_eq!(mesh.material.metalness, 0.9);
    }

    #[test]
    fn test_write_mismatched_variant_restores_common_fields() {
        let mesh = mesh_object("Cube 1", GeometryKind::Cube).at(Vec3::new(1.0, 1.0, 1.0));
        let snap = capture(&mesh).unwrap();

        let mut light = light_object("Point Light 1", LightPreset::Point);
        write(&mut light, &snap);
        assert_eq!(light.transform.position, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(light.as_light().unwrap().color, 0xffffff);
    }

    #[test]
    fn test_apply_notifies_once() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(Channel::ObjectChanged, move |e| sink.borrow_mut().push(e.clone()));

        let mut obj = light_object("Point Light 1", LightPreset::Point);
        obj.id = 9;
        let snap = capture(&obj).unwrap();
        assert!(apply(Some(&mut obj), Some(&snap), &bus));
        assert_eq!(*seen.borrow(), vec![EditorEvent::ObjectChanged(9)]);
    }

    #[test]
    fn test_apply_absent_is_noop() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        bus.subscribe_all(move |_| *sink.borrow_mut() += 1);

        let mut obj = mesh_object("Cube 1", GeometryKind::Cube);
        let snap = capture(&obj).unwrap();
        assert!(!apply(None, Some(&snap), &bus));
        assert!(!apply(Some(&mut obj), None, &bus));
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_persisted_geometry_is_optional() {
        let obj = mesh_object("Thing", GeometryKind::Torus);
        match to_persisted(&obj, false).unwrap() {
            PersistedObject::Mesh { geometry, .. } => assert_eq!(geometry, None),
            _ => panic!("Expected Mesh"),
        }
        let restored = from_persisted(&to_persisted(&obj, true).unwrap(), 1024).unwrap();
        assert_eq!(restored.as_mesh().unwrap().geometry, GeometryKind::Torus);

        let inferred = from_persisted(&to_persisted(&obj, false).unwrap(), 1024).unwrap();
        assert_eq!(inferred.as_mesh().unwrap().geometry, GeometryKind::Cube);
    }

    #[test]
    fn test_from_persisted_spot_defaults_and_shadows() {
        let entry = PersistedObject::Light {
            id: 4,
            light_type: "spotlight".to_string(),
            name: "Spot Light 1".to_string(),
            position: [2.0, 5.0, 2.0],
            color: 0xffffff,
            intensity: 2.0,
            angle: None,
            penumbra: None,
        };
        let obj = from_persisted(&entry, 2048).unwrap();
        let light = obj.as_light().unwrap();
        assert_eq!(
            light.kind.spot_params(),
            Some((shared::DEFAULT_SPOT_ANGLE, shared::DEFAULT_SPOT_PENUMBRA))
        );
        assert_eq!(light.shadow_map_size, 2048);
        assert!(obj.cast_shadow);
        assert_eq!(obj.transform.position, Vec3::new(2.0, 5.0, 2.0));
    }

    #[test]
    fn test_from_persisted_unknown_light() {
        let entry = PersistedObject::Light {
            id: 4,
            light_type: "unknownlight".to_string(),
            name: "Mystery".to_string(),
            position: [0.0; 3],
            color: 0,
            intensity: 1.0,
            angle: None,
            penumbra: None,
        };
        assert!(from_persisted(&entry, 1024).is_none());
        assert!(from_persisted(&PersistedObject::Unknown, 1024).is_none());
    }
}

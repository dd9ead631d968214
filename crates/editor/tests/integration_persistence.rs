//! Integration tests for persist/restore through the scene store.

use glam::Vec3;
use scene_editor_lib::events::{Channel, Diagnostic, EditorEvent};
use scene_editor_lib::fixtures::*;
use scene_editor_lib::harness::TestHarness;
use scene_editor_lib::object::{LightKind, LightPreset};
use scene_editor_lib::state::{EditorSettings, MaterialPatch, SceneState};
use scene_editor_lib::store::{FileStore, SceneStore, StoreError};
use shared::{GeometryKind, DEFAULT_SPOT_ANGLE, DEFAULT_SPOT_PENUMBRA};

#[test]
fn test_round_trip_preserves_fields() {
    let mut h = TestHarness::new();
    let cube = h.create_cube();
    h.scene.set_position(cube, Vec3::new(1.0, 2.0, 3.0));
    h.scene.set_material(
        cube,
        MaterialPatch {
            color: Some(0x336699),
            wireframe: Some(true),
            ..Default::default()
        },
    );
    let spot = h.create_light(LightPreset::Spot);
    h.scene.set_rotation(spot, Vec3::ZERO);
    h.scene.persist().unwrap();

    let reopened = h.reopen().unwrap();
    assert_eq!(reopened.object_names(), vec!["Cube 1", "Spot Light 1"]);

    let cube = &reopened.scene.objects()[0];
    assert_eq!(cube.transform.position, Vec3::new(1.0, 2.0, 3.0));
    let material = &cube.as_mesh().unwrap().material;
    assert_eq!(material.color, 0x336699);
    assert!(material.wireframe);

    let spot = &reopened.scene.objects()[1];
    assert_eq!(spot.transform.position, Vec3::new(2.0, 5.0, 2.0));
    assert!(spot.cast_shadow);
    assert_eq!(spot.as_light().unwrap().shadow_map_size, 1024);
    assert_eq!(
        spot.as_light().unwrap().kind.spot_params(),
        Some((DEFAULT_SPOT_ANGLE, DEFAULT_SPOT_PENUMBRA))
    );
}

#[test]
fn test_geometry_inferred_from_name() {
    let mut h = TestHarness::new();
    let sphere = h.create_sphere();
    h.scene.rename(sphere, "Thing");
    let knot = h.create_primitive(GeometryKind::Knot);
    h.scene.rename(knot, "Torus Knot 2");
    h.scene.persist().unwrap();

    let reopened = h.reopen().unwrap();
    let geometries: Vec<_> = reopened
        .scene
        .meshes()
        .map(|m| m.as_mesh().unwrap().geometry)
        .collect();
    // Names lose the geometry: "Thing" falls back to cube, "Torus Knot" is a torus
    assert_eq!(geometries, vec![GeometryKind::Cube, GeometryKind::Torus]);
}

#[test]
fn test_explicit_geometry_wins_over_name() {
    let settings = EditorSettings {
        persist_geometry_kind: true,
        ..Default::default()
    };
    let mut h = TestHarness::with_settings(settings);
    let sphere = h.create_sphere();
    h.scene.rename(sphere, "Cube-shaped sphere");
    h.scene.persist().unwrap();

    let reopened = h.reopen().unwrap();
    let mesh = reopened.scene.objects()[0].as_mesh().unwrap();
    assert_eq!(mesh.geometry, GeometryKind::Sphere);
}

#[test]
fn test_restore_all_primitive_names() {
    let mut h = TestHarness::new();
    h.scene.load_persisted(&persisted_all_primitives());
    let geometries: Vec<_> = h
        .scene
        .objects()
        .iter()
        .map(|o| o.as_mesh().unwrap().geometry)
        .collect();
    assert_eq!(geometries, GeometryKind::ALL.to_vec());
}

#[test]
fn test_unknown_light_type_skipped() {
    let mut h = TestHarness::new();
    let scene = persisted_scene(vec![
        persisted_mesh(1, "Cube 1"),
        persisted_light(2, "Mystery", "unknownlight"),
        persisted_light(3, "Sun", "directionallight"),
    ]);
    h.store.insert_raw(serde_json::to_string(&scene).unwrap());

    assert_eq!(h.scene.restore().unwrap(), 2);
    assert_eq!(h.object_names(), vec!["Cube 1", "Sun"]);
}

#[test]
fn test_restore_publishes_single_graph_change() {
    let mut h = TestHarness::new();
    h.store
        .insert_raw(serde_json::to_string(&persisted_lit_scene()).unwrap());
    h.clear_events();

    assert_eq!(h.scene.restore().unwrap(), 3);
    assert_eq!(h.events(), vec![EditorEvent::SceneGraphChanged]);
    assert!(h.scene.history().is_empty());
}

#[test]
fn test_restore_replaces_live_objects_with_fresh_ids() {
    let mut h = TestHarness::new();
    let before = h.create_cube();
    h.store
        .insert_raw(serde_json::to_string(&persisted_lit_scene()).unwrap());

    h.scene.restore().unwrap();
    let ids = h.object_ids();
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&before));
    assert!(ids.iter().all(|id| *id > before));

    let spot = h.scene.objects()[2].as_light().unwrap();
    assert!(matches!(spot.kind, LightKind::Spot { .. }));
}

#[test]
fn test_autosave_follows_changes() {
    let mut h = TestHarness::new();
    let id = h.create_cube();
    assert!(h.stored_scene().unwrap().is_none());

    h.scene.set_position(id, Vec3::new(0.0, 4.0, 0.0));
    let stored = h.stored_scene().unwrap().unwrap();
    assert_eq!(stored.objects.len(), 1);
}

#[test]
fn test_autosave_disabled() {
    let settings = EditorSettings {
        autosave: false,
        ..Default::default()
    };
    let mut h = TestHarness::with_settings(settings);
    let id = h.create_cube();
    h.scene.set_position(id, Vec3::X);
    h.scene.set_light(id, Default::default());
    assert!(h.stored_scene().unwrap().is_none());
}

/// Store whose writes always fail
struct BrokenStore;

impl SceneStore for BrokenStore {
    fn init(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get(&self) -> Result<Option<shared::PersistedScene>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, _scene: &shared::PersistedScene) -> Result<(), StoreError> {
        Err(StoreError::NoDataDir)
    }
}

#[test]
fn test_autosave_failure_is_reported_not_raised() {
    let mut scene = SceneState::new(BrokenStore, EditorSettings::default());
    let failures = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&failures);
    scene.bus().subscribe(Channel::Diagnostic, move |e| {
        if let EditorEvent::Diagnostic(Diagnostic::PersistFailed(msg)) = e {
            sink.borrow_mut().push(msg.clone());
        }
    });

    let id = scene.create_primitive(GeometryKind::Cube);
    assert!(scene.set_position(id, Vec3::Y));
    assert_eq!(failures.borrow().len(), 1);
    assert!(scene.persist().is_err());
}

#[test]
fn test_file_store_end_to_end() {
    let dir = std::env::temp_dir().join(format!("scene-editor-it-{}", uuid::Uuid::new_v4()));
    let settings = EditorSettings {
        store_dir: Some(dir.clone()),
        ..Default::default()
    };

    {
        let mut scene = SceneState::new(settings.file_store().unwrap(), settings.clone());
        scene.init_store().unwrap();
        scene.create_primitive(GeometryKind::Cylinder);
        scene.create_light(LightPreset::Ambient);
        assert!(scene.persist().unwrap());
    }

    let mut scene = SceneState::new(FileStore::new(&dir), settings);
    assert_eq!(scene.restore().unwrap(), 2);
    let ambient = &scene.objects()[1];
    assert!(!ambient.cast_shadow);
    assert_eq!(ambient.as_light().unwrap().color, 0x404040);

    std::fs::write(dir.join("scene.json"), "{ broken").unwrap();
    assert!(matches!(scene.restore(), Err(StoreError::Parse(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

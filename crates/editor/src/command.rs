//! JSON command protocol for scripted and agent-driven editing.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{GeometryKind, MaterialKind, ObjectId};

use crate::export::export_scene;
use crate::object::LightPreset;
use crate::state::{
    kind_label, EditorMode, EnvironmentPreset, LightPatch, MaterialPatch, SceneState,
};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Create a primitive mesh and select it
    CreatePrimitive { geometry: GeometryKind },
    /// Create a light and select it
    CreateLight { preset: LightPreset },
    /// Remove an object by ID
    Delete { id: ObjectId },
    /// Select an object by ID
    Select { id: ObjectId },
    /// Clear selection.
    ClearSelection,
    /// Change any of position, rotation (radians) and scale
    SetTransform {
        id: ObjectId,
        #[serde(default)]
        position: Option<[f32; 3]>,
        #[serde(default)]
        rotation: Option<[f32; 3]>,
        #[serde(default)]
        scale: Option<[f32; 3]>,
    },
    /// Change mesh material fields
    SetMaterial {
        id: ObjectId,
        #[serde(default)]
        kind: Option<MaterialKind>,
        #[serde(default)]
        color: Option<u32>,
        #[serde(default)]
        metalness: Option<f32>,
        #[serde(default)]
        roughness: Option<f32>,
        #[serde(default)]
        wireframe: Option<bool>,
    },
    /// Change light fields
    SetLight {
        id: ObjectId,
        #[serde(default)]
        color: Option<u32>,
        #[serde(default)]
        intensity: Option<f32>,
        #[serde(default)]
        angle: Option<f32>,
        #[serde(default)]
        penumbra: Option<f32>,
    },
    Rename { id: ObjectId, name: String },
    /// Duplicate the selected object
    Duplicate,
    /// Move the selected object to the origin
    Center,
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Clear the scene, history and environment.
    NewScene,
    /// Write the scene to the store.
    Persist,
    /// Replace the scene with the stored one.
    Restore,
    SetEnvironment { preset: EnvironmentPreset },
    SetMode { mode: EditorMode },
    ToggleShadows,
    Resize { width: u32, height: u32 },
    /// Inspect the scene: list all objects.
    Inspect,
    /// Export the visible scene.
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn not_found(id: ObjectId) -> Self {
        Self::err(format!("Object {id} not found"))
    }
}

/// Execute a single command on the scene.
pub fn execute_command(scene: &mut SceneState, cmd: AgentCommand) -> CommandResponse {
    tracing::debug!("Executing {cmd:?}");
    match cmd {
        AgentCommand::CreatePrimitive { geometry } => {
            let id = scene.create_primitive(geometry);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::CreateLight { preset } => {
            let id = scene.create_light(preset);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::Delete { id } => {
            let removed = scene.remove_object(id);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        AgentCommand::Select { id } => {
            if !scene.contains(id) {
                return CommandResponse::not_found(id);
            }
            scene.select(Some(id));
            CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
        }

        AgentCommand::ClearSelection => {
            scene.select(None);
            CommandResponse::ok()
        }

        AgentCommand::SetTransform {
            id,
            position,
            rotation,
            scale,
        } => {
            let found = scene.update_object(id, |obj| {
                if let Some(p) = position {
                    obj.transform.position = Vec3::from_array(p);
                }
                if let Some(r) = rotation {
                    obj.transform.rotation = Vec3::from_array(r);
                }
                if let Some(s) = scale {
                    obj.transform.scale = Vec3::from_array(s);
                }
            });
            if found {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(id)
            }
        }

        AgentCommand::SetMaterial {
            id,
            kind,
            color,
            metalness,
            roughness,
            wireframe,
        } => {
            if !scene.get_object(id).is_some_and(|o| o.is_mesh()) {
                return CommandResponse::err(format!("Object {id} is not a mesh"));
            }
            if let Some(kind) = kind {
                scene.set_material_kind(id, kind);
            }
            scene.set_material(
                id,
                MaterialPatch {
                    color,
                    metalness,
                    roughness,
                    wireframe,
                },
            );
            CommandResponse::ok()
        }

        AgentCommand::SetLight {
            id,
            color,
            intensity,
            angle,
            penumbra,
        } => {
            let patch = LightPatch {
                color,
                intensity,
                angle,
                penumbra,
            };
            if scene.set_light(id, patch) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Object {id} is not a light"))
            }
        }

        AgentCommand::Rename { id, name } => {
            if scene.rename(id, name) {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(id)
            }
        }

        AgentCommand::Duplicate => match scene.duplicate_selected() {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Nothing selected"),
        },

        AgentCommand::Center => {
            if scene.center_selected() {
                CommandResponse::ok()
            } else {
                CommandResponse::err("Nothing selected")
            }
        }

        AgentCommand::Undo => {
            let success = scene.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = scene.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        AgentCommand::NewScene => {
            scene.new_scene();
            CommandResponse::ok()
        }

        AgentCommand::Persist => match scene.persist() {
            Ok(written) => CommandResponse::ok_with_data(serde_json::json!({ "written": written })),
            Err(e) => CommandResponse::err(format!("Persist failed: {e}")),
        },

        AgentCommand::Restore => match scene.restore() {
            Ok(count) => CommandResponse::ok_with_data(serde_json::json!({ "restored": count })),
            Err(e) => CommandResponse::err(format!("Restore failed: {e}")),
        },

        AgentCommand::SetEnvironment { preset } => {
            scene.set_environment(preset);
            CommandResponse::ok()
        }

        AgentCommand::SetMode { mode } => {
            scene.set_mode(mode);
            CommandResponse::ok()
        }

        AgentCommand::ToggleShadows => {
            let enabled = scene.toggle_shadows();
            CommandResponse::ok_with_data(serde_json::json!({ "shadows": enabled }))
        }

        AgentCommand::Resize { width, height } => {
            scene.resize_viewport(width, height);
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = scene
                .objects()
                .iter()
                .map(|obj| {
                    serde_json::json!({
                        "id": obj.id(),
                        "name": obj.name,
                        "kind": kind_label(obj),
                        "visible": obj.visible,
                        "position": obj.transform.position.to_array(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "light_count": scene.lights().count(),
                "objects": objects,
                "selected": scene.selected_id(),
                "history_index": scene.history().history_index(),
                "history_len": scene.history().len(),
                "mode": scene.mode(),
                "environment": scene.environment().preset,
            }))
        }

        AgentCommand::ExportScene => match serde_json::to_value(export_scene(scene)) {
            Ok(value) => CommandResponse::ok_with_data(value),
            Err(e) => CommandResponse::err(format!("Export failed: {e}")),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(scene: &mut SceneState, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(scene, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    scene: &mut SceneState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(scene, cmd))
        .collect())
}

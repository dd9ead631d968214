pub mod scene;
pub mod settings;

use serde::{Deserialize, Serialize};

pub use scene::environment::{Environment, EnvironmentLight, EnvironmentPreset};
pub use scene::material_ops::{LightPatch, MaterialPatch};
pub use scene::{kind_label, object_display_name, object_icon, SceneState};
pub use settings::EditorSettings;

/// Interaction mode of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Object creation
    #[default]
    Model,
    Select,
    Move,
    Rotate,
    Scale,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Model => "model",
            EditorMode::Select => "select",
            EditorMode::Move => "move",
            EditorMode::Rotate => "rotate",
            EditorMode::Scale => "scale",
        }
    }

    /// Whether the transform gizmo is shown in this mode
    pub fn is_transform(&self) -> bool {
        matches!(self, EditorMode::Move | EditorMode::Rotate | EditorMode::Scale)
    }
}

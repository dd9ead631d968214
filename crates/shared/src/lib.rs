use serde::{Deserialize, Serialize};

/// Stable identifier of an editable object
pub type ObjectId = u64;

/// Durable key of the full scene in the scene store
pub const SCENE_KEY: &str = "scene";

/// Default spot light cone angle (radians)
pub const DEFAULT_SPOT_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

/// Default spot light penumbra
pub const DEFAULT_SPOT_PENUMBRA: f32 = 0.2;

/// Primitive geometry of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Knot,
}

impl GeometryKind {
    /// All kinds, in name-inference priority order
    pub const ALL: [GeometryKind; 6] = [
        GeometryKind::Cube,
        GeometryKind::Sphere,
        GeometryKind::Cylinder,
        GeometryKind::Cone,
        GeometryKind::Torus,
        GeometryKind::Knot,
    ];

    /// Lowercase keyword, as used in commands and name matching
    pub fn keyword(&self) -> &'static str {
        match self {
            GeometryKind::Cube => "cube",
            GeometryKind::Sphere => "sphere",
            GeometryKind::Cylinder => "cylinder",
            GeometryKind::Cone => "cone",
            GeometryKind::Torus => "torus",
            GeometryKind::Knot => "knot",
        }
    }

    /// Capitalized label used for default object names
    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Cube => "Cube",
            GeometryKind::Sphere => "Sphere",
            GeometryKind::Cylinder => "Cylinder",
            GeometryKind::Cone => "Cone",
            GeometryKind::Torus => "Torus",
            GeometryKind::Knot => "Knot",
        }
    }

    /// Guess the geometry from a display name.
    ///
    /// Case-insensitive substring match against the keywords in `ALL` order,
    /// first match wins. Names matching nothing fall back to `Cube`.
    /// "Torus Knot 3" is therefore a torus.
    pub fn infer_from_name(name: &str) -> GeometryKind {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| lower.contains(kind.keyword()))
            .unwrap_or(GeometryKind::Cube)
    }
}

/// Runtime type of a mesh material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Standard,
    Basic,
    Phong,
}

/// Light type tag of persisted and captured lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    #[serde(rename = "pointlight")]
    PointLight,
    #[serde(rename = "directionallight")]
    DirectionalLight,
    #[serde(rename = "spotlight")]
    SpotLight,
    #[serde(rename = "ambientlight")]
    AmbientLight,
}

impl LightType {
    /// Tag string as stored in the persisted scene
    pub fn as_str(&self) -> &'static str {
        match self {
            LightType::PointLight => "pointlight",
            LightType::DirectionalLight => "directionallight",
            LightType::SpotLight => "spotlight",
            LightType::AmbientLight => "ambientlight",
        }
    }

    /// Parse a persisted tag; unknown tags yield `None`
    pub fn from_type_str(tag: &str) -> Option<LightType> {
        match tag {
            "pointlight" => Some(LightType::PointLight),
            "directionallight" => Some(LightType::DirectionalLight),
            "spotlight" => Some(LightType::SpotLight),
            "ambientlight" => Some(LightType::AmbientLight),
            _ => None,
        }
    }
}

/// Captured material fields of a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSnapshot {
    #[serde(default)]
    pub kind: MaterialKind,
    /// 24-bit RGB
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    #[serde(default)]
    pub wireframe: bool,
}

/// Immutable projection of an object's mutable fields at one point in time.
///
/// Carries neither id nor name; the owning action tracks identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Snapshot {
    Mesh {
        position: [f32; 3],
        rotation: [f32; 3],
        scale: [f32; 3],
        visible: bool,
        cast_shadow: bool,
        receive_shadow: bool,
        material: MaterialSnapshot,
    },
    Light {
        #[serde(rename = "lightType")]
        light_type: LightType,
        position: [f32; 3],
        rotation: [f32; 3],
        visible: bool,
        cast_shadow: bool,
        color: u32,
        intensity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        angle: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penumbra: Option<f32>,
    },
}

impl Snapshot {
    /// Position shared by both variants
    pub fn position(&self) -> [f32; 3] {
        match self {
            Snapshot::Mesh { position, .. } | Snapshot::Light { position, .. } => *position,
        }
    }
}

/// Material descriptor of a persisted mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedMaterial {
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    #[serde(default)]
    pub wireframe: bool,
}

/// One entry of the persisted scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersistedObject {
    Mesh {
        id: ObjectId,
        name: String,
        position: [f32; 3],
        rotation: [f32; 3],
        scale: [f32; 3],
        material: PersistedMaterial,
        /// Written only when explicit geometry persistence is enabled;
        /// absent entries fall back to name inference on restore
        #[serde(default, skip_serializing_if = "Option::is_none")]
        geometry: Option<GeometryKind>,
    },
    Light {
        id: ObjectId,
        /// Kept as a raw string so unknown light types survive parsing
        #[serde(rename = "lightType")]
        light_type: String,
        name: String,
        position: [f32; 3],
        color: u32,
        intensity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        angle: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penumbra: Option<f32>,
    },
    /// Entry of a type this version does not know about
    #[serde(other)]
    Unknown,
}

impl PersistedObject {
    /// Display name, if the entry carries one
    pub fn name(&self) -> Option<&str> {
        match self {
            PersistedObject::Mesh { name, .. } | PersistedObject::Light { name, .. } => Some(name),
            PersistedObject::Unknown => None,
        }
    }
}

/// Full persisted scene, stored under [`SCENE_KEY`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersistedScene {
    #[serde(default)]
    pub objects: Vec<PersistedObject>,
}

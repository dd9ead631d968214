//! Live editable objects (meshes, lights, imported models)

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{GeometryKind, LightType, MaterialKind, ObjectId, DEFAULT_SPOT_ANGLE, DEFAULT_SPOT_PENUMBRA};

/// Default mesh color for new primitives
pub const DEFAULT_MESH_COLOR: u32 = 0x5f3dc4;
/// Default shadow map resolution of shadow-casting lights
pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 1024;
/// Id of an object not yet adopted by a scene
pub const UNASSIGNED_ID: ObjectId = 0;

const MIN_SPOT_ANGLE: f32 = 1.0e-4;
const MAX_SPOT_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

/// Object transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Ignored for lights
    pub scale: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Identity transform translated to `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Mesh material descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Runtime material type
    pub kind: MaterialKind,
    /// 24-bit RGB
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub wireframe: bool,
}

impl Material {
    /// Standard (PBR) material, with factors clamped to [0, 1]
    pub fn standard(color: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: color & 0xff_ffff,
            metalness: unit(metalness),
            roughness: unit(roughness),
            wireframe: false,
        }
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color & 0xff_ffff;
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.metalness = unit(metalness);
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = unit(roughness);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(DEFAULT_MESH_COLOR, 0.3, 0.4)
    }
}

/// Primitive mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: GeometryKind,
    pub material: Material,
}

/// Light kind; spot parameters live on the spot variant only
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point,
    Directional,
    Spot { angle: f32, penumbra: f32 },
    Ambient,
}

impl LightKind {
    /// Spot light with angle clamped to (0, π/2] and penumbra to [0, 1]
    pub fn spot(angle: f32, penumbra: f32) -> Self {
        LightKind::Spot {
            angle: angle.clamp(MIN_SPOT_ANGLE, MAX_SPOT_ANGLE),
            penumbra: unit(penumbra),
        }
    }

    /// Build from a captured/persisted type tag
    pub fn from_light_type(ty: LightType, angle: Option<f32>, penumbra: Option<f32>) -> Self {
        match ty {
            LightType::PointLight => LightKind::Point,
            LightType::DirectionalLight => LightKind::Directional,
            LightType::SpotLight => LightKind::spot(
                angle.unwrap_or(DEFAULT_SPOT_ANGLE),
                penumbra.unwrap_or(DEFAULT_SPOT_PENUMBRA),
            ),
            LightType::AmbientLight => LightKind::Ambient,
        }
    }

    pub fn light_type(&self) -> LightType {
        match self {
            LightKind::Point => LightType::PointLight,
            LightKind::Directional => LightType::DirectionalLight,
            LightKind::Spot { .. } => LightType::SpotLight,
            LightKind::Ambient => LightType::AmbientLight,
        }
    }

    /// Ambient light has no direction and never casts shadows
    pub fn casts_shadows(&self) -> bool {
        !matches!(self, LightKind::Ambient)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LightKind::Point => "Point",
            LightKind::Directional => "Directional",
            LightKind::Spot { .. } => "Spot",
            LightKind::Ambient => "Ambient",
        }
    }

    pub fn preset(&self) -> LightPreset {
        match self {
            LightKind::Point => LightPreset::Point,
            LightKind::Directional => LightPreset::Directional,
            LightKind::Spot { .. } => LightPreset::Spot,
            LightKind::Ambient => LightPreset::Ambient,
        }
    }

    /// Spot (angle, penumbra), if this is a spot light
    pub fn spot_params(&self) -> Option<(f32, f32)> {
        match self {
            LightKind::Spot { angle, penumbra } => Some((*angle, *penumbra)),
            _ => None,
        }
    }
}

/// Light factory presets offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPreset {
    Point,
    Directional,
    Spot,
    Ambient,
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// 24-bit RGB
    pub color: u32,
    pub intensity: f32,
    /// Shadow map resolution (width = height); unused by ambient lights
    pub shadow_map_size: u32,
}

impl Light {
    pub fn new(kind: LightKind, color: u32, intensity: f32) -> Self {
        Self {
            kind,
            color: color & 0xff_ffff,
            intensity: intensity.max(0.0),
            shadow_map_size: DEFAULT_SHADOW_MAP_SIZE,
        }
    }

    /// Default light and placement for a preset
    pub fn from_preset(preset: LightPreset) -> (Light, Vec3) {
        match preset {
            LightPreset::Point => (
                Light::new(LightKind::Point, 0xffffff, 1.0),
                Vec3::new(2.0, 2.0, 2.0),
            ),
            LightPreset::Directional => (
                Light::new(LightKind::Directional, 0xffffff, 1.0),
                Vec3::new(5.0, 5.0, 5.0),
            ),
            LightPreset::Spot => (
                Light::new(
                    LightKind::spot(DEFAULT_SPOT_ANGLE, DEFAULT_SPOT_PENUMBRA),
                    0xffffff,
                    1.0,
                ),
                Vec3::new(2.0, 5.0, 2.0),
            ),
            LightPreset::Ambient => (Light::new(LightKind::Ambient, 0x404040, 1.0), Vec3::ZERO),
        }
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color & 0xff_ffff;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }
}

/// Model brought in through the import path.
///
/// Neither a mesh nor a light: the snapshot codec does not recognize it, so
/// it is never captured into history payloads nor persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedModel {
    /// File name or URI the model came from
    pub source: String,
    /// Number of meshes in the model hierarchy
    pub mesh_count: usize,
}

/// Variant data of an editable object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Mesh(Mesh),
    Light(Light),
    Model(ImportedModel),
}

/// An entity of the scene graph the user can select, transform and persist
#[derive(Debug, Clone, PartialEq)]
pub struct EditableObject {
    pub(crate) id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub cast_shadow: bool,
    /// Meaningful for meshes only
    pub receive_shadow: bool,
    pub kind: ObjectKind,
}

impl EditableObject {
    /// Object not yet owned by a scene; the scene assigns its id on insertion
    pub fn detached(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self::with_id(UNASSIGNED_ID, name, kind)
    }

    pub(crate) fn with_id(id: ObjectId, name: impl Into<String>, kind: ObjectKind) -> Self {
        let cast_shadow = match &kind {
            ObjectKind::Mesh(_) => true,
            ObjectKind::Light(light) => light.kind.casts_shadows(),
            ObjectKind::Model(_) => true,
        };
        let receive_shadow = !matches!(kind, ObjectKind::Light(_));
        Self {
            id,
            name: name.into(),
            transform: Transform::new(),
            visible: true,
            cast_shadow,
            receive_shadow,
            kind,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, ObjectKind::Mesh(_))
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, ObjectKind::Light(_))
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Builder: place at `position`
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

fn unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

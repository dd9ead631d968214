//! Environment lighting presets
//!
//! Environment lights belong to the scene backdrop. They are not editable
//! objects: they never appear in the live list, history or persisted scene.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::SceneState;
use crate::events::EditorEvent;
use crate::object::LightKind;

/// Named environment setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentPreset {
    #[default]
    Studio,
    Sunset,
    Night,
    Forest,
}

impl EnvironmentPreset {
    pub fn display_name(&self) -> &'static str {
        match self {
            EnvironmentPreset::Studio => "Studio",
            EnvironmentPreset::Sunset => "Sunset",
            EnvironmentPreset::Night => "Night",
            EnvironmentPreset::Forest => "Forest",
        }
    }
}

/// Backdrop light of an environment
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentLight {
    /// Ambient or directional
    pub kind: LightKind,
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
}

impl EnvironmentLight {
    fn ambient(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            position: Vec3::ZERO,
            cast_shadow: false,
        }
    }

    fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            position,
            cast_shadow: false,
        }
    }

    fn casting(mut self) -> Self {
        self.cast_shadow = true;
        self
    }
}

/// Background color and backdrop lights
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub preset: EnvironmentPreset,
    /// 24-bit RGB
    pub background: u32,
    pub lights: Vec<EnvironmentLight>,
}

impl Environment {
    pub fn from_preset(preset: EnvironmentPreset) -> Self {
        let (background, lights) = match preset {
            EnvironmentPreset::Studio => (
                0x111111,
                vec![
                    EnvironmentLight::ambient(0xffffff, 0.4),
                    EnvironmentLight::directional(0xffffff, 0.8, Vec3::new(5.0, 10.0, 7.5))
                        .casting(),
                    EnvironmentLight::directional(0xffffff, 0.3, Vec3::new(-5.0, 5.0, 5.0)),
                    EnvironmentLight::directional(0xffffff, 0.2, Vec3::new(0.0, 5.0, -10.0)),
                ],
            ),
            EnvironmentPreset::Sunset => (
                0x661100,
                vec![
                    EnvironmentLight::ambient(0xff9966, 0.3),
                    EnvironmentLight::directional(0xff7700, 1.0, Vec3::new(-10.0, 5.0, 10.0))
                        .casting(),
                    EnvironmentLight::directional(0x0066ff, 0.2, Vec3::new(10.0, 5.0, -10.0)),
                ],
            ),
            EnvironmentPreset::Night => (
                0x001122,
                vec![
                    EnvironmentLight::ambient(0x0022ff, 0.1),
                    EnvironmentLight::directional(0x8888ff, 0.5, Vec3::new(5.0, 10.0, -5.0))
                        .casting(),
                ],
            ),
            EnvironmentPreset::Forest => (
                0x113322,
                vec![
                    EnvironmentLight::ambient(0x88aa77, 0.5),
                    EnvironmentLight::directional(0xffcc88, 0.7, Vec3::new(3.0, 10.0, 5.0))
                        .casting(),
                ],
            ),
        };
        Self {
            preset,
            background,
            lights,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_preset(EnvironmentPreset::default())
    }
}

impl SceneState {
    /// Replace the backdrop; editable lights are untouched
    pub fn set_environment(&mut self, preset: EnvironmentPreset) {
        let mut environment = Environment::from_preset(preset);
        if !self.shadows_enabled {
            for light in &mut environment.lights {
                light.cast_shadow = false;
            }
        }
        self.environment = environment;
        tracing::debug!("Environment set to {}", preset.display_name());
        self.bus.publish(EditorEvent::SceneEnvironmentChanged);
    }
}

/// JSON scene configuration. Every field is optional; missing ones take the
/// values the renderer was tuned with.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::lighting::{LightSource, Material};
use crate::math::Vec3;
use crate::projection::Camera;
use crate::raster::DEFAULT_BACKGROUND;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    /// Mesh region name (`g`/`o` annotation) -> tint; `"*"` tints every
    /// vertex without its own entry
    pub regions: BTreeMap<String, Color>,
    pub controls: ControlConfig,
    pub background: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub max_depth: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub intensity: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub ambient_light: Color,
    pub ambient: Color,
    pub diffuse: Color,
}

/// Step sizes for the interactive commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub rotate_step_degrees: f32,
    pub scale_up: f32,
    pub scale_down: f32,
    pub translate_step: [f32; 3],
    pub camera_step: f32,
    pub frame_millis: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            material: MaterialConfig::default(),
            regions: BTreeMap::new(),
            controls: ControlConfig::default(),
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            position: camera.position.into(),
            target: camera.target.into(),
            fov_degrees: camera.fov.to_degrees(),
            near: camera.near,
            far: camera.far,
            max_depth: camera.max_depth,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = LightSource::default();
        Self {
            position: light.position.into(),
            intensity: light.intensity,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        let m = Material::default();
        Self {
            ambient_light: m.ambient_light,
            ambient: m.ambient,
            diffuse: m.diffuse,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotate_step_degrees: 2.0,
            scale_up: 1.5,
            scale_down: 0.75,
            translate_step: [1.0, 1.0, 1.0],
            camera_step: 4.0,
            frame_millis: 33,
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("scene config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn camera(&self) -> Camera {
        let c = &self.camera;
        Camera {
            position: Vec3::from(c.position),
            target: Vec3::from(c.target),
            fov: c.fov_degrees.to_radians(),
            near: c.near,
            far: c.far,
            max_depth: c.max_depth,
        }
    }

    pub fn light(&self) -> LightSource {
        LightSource::new(Vec3::from(self.light.position), self.light.intensity)
    }

    pub fn material(&self) -> Material {
        Material {
            ambient_light: self.material.ambient_light,
            ambient: self.material.ambient,
            diffuse: self.material.diffuse,
        }
    }
}

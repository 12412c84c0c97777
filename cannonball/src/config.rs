//! Scene configuration
//!
//! Every field has a default, so a config file only needs the values it
//! wants to change:
//!
//! ```json
//! { "cannon_direction": [2.0, 4.0, -1.0], "camera_position": [0.0, 100.0, 300.0] }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::controls::StaticObject;
use crate::physics::{Cannon, DEFAULT_HALF_EXTENTS, GRAVITY};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,

    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub light_direction: Vec3,
    pub light_intensity: f32,
    pub ambient_intensity: f32,
    pub clear_color: [f32; 4],

    pub ball_radius: f32,
    pub cannon_radius: f32,
    pub cannon_direction: Vec3,
    pub cannon_position: Vec3,

    pub gravity: f32,
    pub bounds: Vec3,
    pub trail_length: usize,
    pub objects: Vec<StaticObject>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let cannon = Cannon::default();
        Self {
            title: "Cannonball - Rust/wgpu".to_string(),
            width: 1280,
            height: 720,

            camera_position: Vec3::new(0.0, 0.0, 150.0),
            camera_target: Vec3::ZERO,
            fov_degrees: 80.0,
            near: 0.1,
            far: 2000.0,

            light_direction: Vec3::ONE,
            light_intensity: 1.0,
            ambient_intensity: 0.1,
            clear_color: [1.0, 1.0, 1.0, 1.0],

            ball_radius: 10.0,
            cannon_radius: 15.0,
            cannon_direction: cannon.direction,
            cannon_position: cannon.position,

            gravity: GRAVITY,
            bounds: DEFAULT_HALF_EXTENTS,
            trail_length: 240,
            objects: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Use the first argument after the program name as a config path, if any
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        match args.into_iter().nth(1) {
            Some(path) => {
                log::info!("Loading scene config from {}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.bounds.min_element() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bounds must be positive, got {:?}",
                self.bounds
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if self.near <= 0.0 || self.near >= self.far {
            return Err(ConfigError::Invalid(format!(
                "expected 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }

    pub fn cannon(&self) -> Cannon {
        Cannon::new(self.cannon_direction, self.cannon_position)
    }
}

//! Viewer configuration.
//!
//! Every field has a default matching the reference scene, so a config file only
//! needs the values it wants to change.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{camera::MAX_PITCH, scene::SlopeStyle};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Baseplate".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    /// Degrees of rotation per pixel of pointer motion.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            move_speed: 5.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub slope_style: SlopeStyle,
    /// Stop camera movement and mouse look while paused.
    pub pause_freezes_camera: bool,
    pub clear_color: [f32; 4],
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            slope_style: SlopeStyle::default(),
            pause_freezes_camera: true,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vertex_shader: PathBuf::from("shaders/basic_vertex.glsl"),
            fragment_shader: PathBuf::from("shaders/basic_fragment.glsl"),
        }
    }
}

impl ViewerConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let camera = &self.camera;
        if !camera.position.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "camera position must be finite, got {}",
                camera.position
            )));
        }
        if !(camera.move_speed.is_finite() && camera.move_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "move speed must be positive, got {}",
                camera.move_speed
            )));
        }
        if !(camera.sensitivity.is_finite() && camera.sensitivity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sensitivity must be positive, got {}",
                camera.sensitivity
            )));
        }
        if !camera.yaw.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "yaw must be finite, got {}",
                camera.yaw
            )));
        }
        if !(camera.pitch > -MAX_PITCH && camera.pitch < MAX_PITCH) {
            return Err(ConfigError::Invalid(format!(
                "pitch must lie in (-{MAX_PITCH}, {MAX_PITCH}), got {}",
                camera.pitch
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.position, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(config.camera.yaw, -90.0);
        assert_eq!(config.slope_style, SlopeStyle::Prism);
        assert_eq!((config.window.width, config.window.height), (800, 600));
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "window": { "width": 1280 },
            "camera": { "position": [1.0, 2.0, 3.0], "move_speed": 2.5 },
            "slope_style": "triangle",
            "pause_freezes_camera": false
        }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "Baseplate");
        assert_eq!(config.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.move_speed, 2.5);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.slope_style, SlopeStyle::Triangle);
        assert!(!config.pause_freezes_camera);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ViewerConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ViewerConfig::default();
        config.camera.move_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.sensitivity = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.pitch = 89.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.yaw = f32::NAN;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("yaw"), "{message}");
        assert!(!message.contains("pitch"), "{message}");
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("bp-core-missing-config.json");
        assert!(matches!(
            ViewerConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = std::env::temp_dir().join(format!("bp-core-broken-{}.json", std::process::id()));
        std::fs::write(&broken, "{ not json").unwrap();
        let result = ViewerConfig::load(&broken);
        std::fs::remove_file(&broken).unwrap();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_roundtrip_file() {
        let path = std::env::temp_dir().join(format!("bp-core-config-{}.json", std::process::id()));
        let mut config = ViewerConfig::default();
        config.window.title = "Test".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = ViewerConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), config);
    }
}

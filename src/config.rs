//! Editor settings loaded from a JSON file. Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::binding::DEFAULT_PLACEHOLDER_TEXTURE;
use crate::render::CameraController;
use crate::schema::serialization::{load_schema_from_file, SerializationError};
use crate::schema::PropertySchema;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error: {0}")]
    Schema(#[from] SerializationError),
    #[error("viewport must be at least 1x1, got {0}x{1}")]
    InvalidViewport(u32, u32),
    #[error("camera position and target coincide")]
    DegenerateCamera,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, -10.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Property schema file; the built-in material layout when unset.
    pub schema_path: Option<PathBuf>,
    /// Image used when a texture is added to an empty slot.
    pub placeholder_texture: String,
    pub viewport: [u32; 2],
    pub camera: CameraSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            placeholder_texture: DEFAULT_PLACEHOLDER_TEXTURE.to_string(),
            viewport: [1280, 720],
            camera: CameraSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.viewport;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidViewport(width, height));
        }
        let position = glam::Vec3::from(self.camera.position);
        let target = glam::Vec3::from(self.camera.target);
        if position.distance_squared(target) < 1e-8 {
            return Err(ConfigError::DegenerateCamera);
        }
        Ok(())
    }

    pub fn load_schema(&self) -> Result<PropertySchema> {
        match &self.schema_path {
            Some(path) => Ok(load_schema_from_file(path)?),
            None => Ok(PropertySchema::default_material()),
        }
    }

    pub fn camera(&self) -> CameraController {
        CameraController::looking_at(self.camera.position, self.camera.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::serialization::save_schema_to_file;
    use crate::schema::PropertyDescriptor;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.placeholder_texture, "assets/images/texture2.jpg");
        assert_eq!(config.load_schema().unwrap(), PropertySchema::default_material());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = EditorConfig::from_json(
            r#"{ "placeholder_texture": "checker.png", "camera": { "position": [0, 2, -4] } }"#,
        )
        .unwrap();
        assert_eq!(config.placeholder_texture, "checker.png");
        assert_eq!(config.viewport, [1280, 720]);
        assert_eq!(config.camera.position, [0.0, 2.0, -4.0]);
        assert_eq!(config.camera.target, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "viewport": [0, 720] }"#),
            Err(ConfigError::InvalidViewport(0, 720))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "camera": { "position": [0, 0, 0] } }"#),
            Err(ConfigError::DegenerateCamera)
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "viewport": "wide" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn schema_path_is_loaded_from_disk() {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!(
            "material_panel_config_schema_{}_{}.json",
            std::process::id(),
            nonce
        ));
        let schema = PropertySchema::new(vec![PropertyDescriptor::boolean("unlit")]).unwrap();
        save_schema_to_file(&schema, &path).unwrap();

        let config = EditorConfig {
            schema_path: Some(path.clone()),
            ..EditorConfig::default()
        };
        assert_eq!(config.load_schema().unwrap(), schema);

        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            config.load_schema(),
            Err(ConfigError::Schema(SerializationError::Io(_)))
        ));
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// Startup settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Radians added to the box rotation per tick
    pub rotation_rate: f32,
    /// 0xRRGGBB
    pub mesh_color: u32,
    /// 0xRRGGBB
    pub background: u32,
    pub camera_distance: f32,
    pub width: u32,
    pub height: u32,
    pub show_panel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rotation_rate: 0.005,
            mesh_color: 0xf0f000,
            background: 0xffffff,
            camera_distance: 5.0,
            width: 1280,
            height: 720,
            show_panel: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rotation_rate.is_finite() {
            return Err(ViewerError::Config(format!(
                "rotation_rate must be finite, got {}",
                self.rotation_rate
            )));
        }
        if !(self.camera_distance > 0.0) {
            return Err(ViewerError::Config(format!(
                "camera_distance must be positive, got {}",
                self.camera_distance
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mesh_color > 0xffffff || self.background > 0xffffff {
            return Err(ViewerError::Config("colors must be 0xRRGGBB".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json(r#"{ "rotation_rate": 0.02, "show_panel": false }"#).unwrap();
        assert_eq!(config.rotation_rate, 0.02);
        assert!(!config.show_panel);
        assert_eq!(config.mesh_color, 0xf0f000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ViewerConfig::from_json(r#"{ "fov": 90 }"#).unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "camera_distance": 0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "width": 0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "background": 16777216 }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ViewerConfig::load("/nonexistent/viewer.json").unwrap_err();
        assert!(matches!(err, ViewerError::Io(_)));
    }
}

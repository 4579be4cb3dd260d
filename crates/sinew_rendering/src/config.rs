//! # Renderer Configuration
//!
//! Loaded once at startup, usually from a TOML file:
//!
//! ```toml
//! render_meshes = true
//! front_facing = true
//! z_spacing = -0.01
//! submesh_separators = ["weapon", "shield"]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Configuration for a [`SkeletonRenderer`](crate::SkeletonRenderer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Render triangulated mesh attachments. When false only region quads are drawn.
    pub render_meshes: bool,
    /// Fill each submesh's index buffer once and never rewrite it.
    pub immutable_triangles: bool,
    /// Reverse triangle winding for slots whose bone is mirrored on one axis.
    pub front_facing: bool,
    /// Emit a constant normal stream (0, 0, -1).
    pub calculate_normals: bool,
    /// Emit a constant tangent stream (1, 0, 0, -1). Requires normals.
    pub calculate_tangents: bool,
    /// Depth offset between consecutive draw-order slots.
    pub z_spacing: f32,
    /// Log configuration and material errors.
    pub log_errors: bool,
    /// Names of slots that always start a new submesh.
    pub submesh_separators: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            render_meshes: true,
            immutable_triangles: false,
            front_facing: false,
            calculate_normals: false,
            calculate_tangents: false,
            z_spacing: 0.0,
            log_errors: false,
            submesh_separators: Vec::new(),
        }
    }
}

impl RendererConfig {
    /// Parses and validates a TOML configuration. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` on malformed TOML and `InvalidConfig` if validation fails.
    pub fn from_toml_str(source: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if tangents are requested without normals or the
    /// z spacing is not finite.
    pub fn validate(&self) -> RenderResult<()> {
        if self.calculate_tangents && !self.calculate_normals {
            return Err(RenderError::InvalidConfig(
                "calculate_tangents requires calculate_normals".to_string(),
            ));
        }
        if !self.z_spacing.is_finite() {
            return Err(RenderError::InvalidConfig(format!(
                "z_spacing must be finite, got {}",
                self.z_spacing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert!(config.render_meshes);
        assert!(!config.immutable_triangles);
        assert!(!config.calculate_normals);
        assert!(config.submesh_separators.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = RendererConfig::from_toml_str(
            r#"
            front_facing = true
            z_spacing = -0.5
            submesh_separators = ["weapon"]
            "#,
        )
        .unwrap();

        assert!(config.front_facing);
        assert!(config.render_meshes);
        assert!((config.z_spacing + 0.5).abs() < f32::EPSILON);
        assert_eq!(config.submesh_separators, vec!["weapon".to_string()]);
    }

    #[test]
    fn test_tangents_require_normals() {
        let result = RendererConfig::from_toml_str("calculate_tangents = true");
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));

        let ok = RendererConfig::from_toml_str(
            "calculate_tangents = true\ncalculate_normals = true",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let result = RendererConfig::from_toml_str("z_spacing = \"far\"");
        assert!(matches!(result, Err(RenderError::ConfigParse(_))));
    }

    #[test]
    fn test_non_finite_spacing() {
        let config = RendererConfig {
            z_spacing: f32::NAN,
            ..RendererConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

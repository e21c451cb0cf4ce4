//! Material definitions for full-screen effects

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Shared, immutable reference to a material
pub type MaterialHandle = Arc<Material>;

/// Shader asset used by [`Material::tint`]
pub const TINT_SHADER_ASSET: &str = "shaders/tint.wgsl";

/// A shader plus the parameters it is run with.
///
/// The shader itself is an external asset; the material only names it.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Shader asset identifier
    pub shader: String,
    pub tint_color: Vec4,
    /// 0 keeps the source color, 1 applies the full tint
    pub intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            shader: TINT_SHADER_ASSET.to_string(),
            tint_color: Vec4::ONE,
            intensity: 1.0,
        }
    }
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_tint_color(mut self, color: Vec4) -> Self {
        self.tint_color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity.clamp(0.0, 1.0);
        self
    }

    /// Wrap into a shareable handle
    pub fn into_handle(self) -> MaterialHandle {
        Arc::new(self)
    }

    /// Create a uniform data struct for GPU
    pub fn uniform_data(&self) -> TintUniform {
        TintUniform {
            tint_color: self.tint_color,
            params: [self.intensity, 0.0, 0.0, 0.0],
        }
    }

    // Preset materials

    pub fn tint(color: Vec4) -> Self {
        Self::new("tint").with_tint_color(color)
    }

    pub fn sepia() -> Self {
        Self::new("sepia").with_tint_color(Vec4::new(1.0, 0.89, 0.71, 1.0))
    }
}

/// Tint uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TintUniform {
    pub tint_color: Vec4,
    pub params: [f32; 4], // x=intensity, yzw=padding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_clamped() {
        assert_eq!(Material::new("a").with_intensity(3.0).intensity, 1.0);
        assert_eq!(Material::new("a").with_intensity(-1.0).intensity, 0.0);
    }

    #[test]
    fn test_uniform_layout() {
        let material = Material::tint(Vec4::new(1.0, 0.5, 0.25, 1.0)).with_intensity(0.75);
        let uniform = material.uniform_data();
        let bytes = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 32);
        assert_eq!(uniform.params[0], 0.75);
        assert_eq!(uniform.tint_color.y, 0.5);
    }

    #[test]
    fn test_preset_uses_tint_shader() {
        assert_eq!(Material::sepia().shader, TINT_SHADER_ASSET);
    }
}

//! Render Tint - a post-processing feature for render graph based pipelines
//!
//! The crate provides a single full-screen "tint" pass that is injected right
//! after opaque geometry. The pass copies the active camera color into a fresh
//! intermediate texture through a material blit, then rebinds the camera color
//! so every later pass in the frame consumes the tinted result.
//!
//! # Features
//! - Frame graph with resource declaration, culling and deterministic ordering
//! - Host renderer with fixed injection points for renderer features
//! - Tint pass with soft-failing preconditions (missing target, missing material)
//! - Dummy backend for executing graphs without GPU hardware

pub mod backend;
pub mod feature;
pub mod pipeline;
pub mod render_graph;
pub mod resources;
pub mod scene;

pub use backend::{BackendError, BackendResult, DummyBackend, GraphicsBackend, TextureHandle};
pub use feature::{RendererFeature, TintFeature, TintFeatureSettings};
pub use pipeline::postprocess::TintPass;
pub use pipeline::{InjectionPoint, IntermediateTextureMode, PassQueue, Renderer};
pub use render_graph::{FrameGraph, FrameResources, PassError, RenderGraph, ResourceId};
pub use resources::{Material, MaterialHandle};
pub use scene::Camera;

use backend::TextureFormat;

/// Configuration for the host renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Renderer name, used in log messages
    pub name: String,
    /// When the camera renders into an intermediate color texture
    pub intermediate_texture: IntermediateTextureMode,
    /// Format of intermediate camera color textures
    pub color_format: TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            name: "Forward Renderer".to_string(),
            intermediate_texture: IntermediateTextureMode::Auto,
            color_format: TextureFormat::Rgba8Unorm,
        }
    }
}

/// Install the default logger (native only).
///
/// Defaults to `Info` and honours `RUST_LOG`. Calling it twice is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

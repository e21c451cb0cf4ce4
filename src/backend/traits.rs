//! Core backend abstraction traits
//!
//! The frame graph never talks to a GPU API directly. A compiled graph is
//! replayed against a [`GraphicsBackend`] by the executor.

use crate::backend::types::*;
use crate::resources::Material;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to create texture: {0}")]
    TextureCreationFailed(String),
    #[error("Unknown texture handle: {0:?}")]
    InvalidTexture(TextureHandle),
    #[error("Resource {0} has no backing texture")]
    ResourceNotAllocated(String),
    #[error("Out of memory: {requested} bytes requested, {available} available")]
    OutOfMemory { requested: u64, available: u64 },
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u64);

impl TextureHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Operations a backend must provide to run a compiled frame graph
pub trait GraphicsBackend {
    /// Get the backend name
    fn name(&self) -> &str;

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle>;

    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Render a pipeline stage (opaque, transparent, ...) into `target`.
    fn draw_stage(&mut self, label: &str, target: TextureHandle, clear: bool) -> BackendResult<()>;

    /// Full-screen copy from `source` to `destination`.
    ///
    /// With a material every pixel passes through its shader, otherwise the
    /// copy is raw.
    fn blit(
        &mut self,
        source: TextureHandle,
        destination: TextureHandle,
        material: Option<&Material>,
        subpass: u32,
        label: &str,
    ) -> BackendResult<()>;
}

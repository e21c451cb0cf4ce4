//! Frame pipeline
//!
//! The host side of the frame: a fixed stage sequence with injection points
//! where renderer features may insert passes.
//! 1. Opaque geometry
//! 2. Transparent geometry
//! 3. Final blit of the camera color into the back buffer

pub mod postprocess;
pub mod renderer;

pub use renderer::Renderer;

use std::sync::Arc;

use crate::render_graph::RenderPass;

/// Points in the stage sequence where passes can be inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InjectionPoint {
    BeforeOpaque,
    /// Immediately after opaque geometry
    AfterOpaque,
    BeforeTransparent,
    /// After transparent geometry, before the final blit
    AfterTransparent,
}

impl InjectionPoint {
    pub const ALL: [InjectionPoint; 4] = [
        InjectionPoint::BeforeOpaque,
        InjectionPoint::AfterOpaque,
        InjectionPoint::BeforeTransparent,
        InjectionPoint::AfterTransparent,
    ];
}

/// When a camera renders into an intermediate color texture instead of the
/// back buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntermediateTextureMode {
    /// Only when a queued pass requires one
    #[default]
    Auto,
    Always,
    Never,
}

/// The passes the renderer records for the current camera
#[derive(Default)]
pub struct PassQueue {
    passes: Vec<Arc<dyn RenderPass>>,
}

impl PassQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass. Enqueuing the same instance twice is a no-op.
    pub fn enqueue(&mut self, pass: Arc<dyn RenderPass>) {
        if self.passes.iter().any(|p| Arc::ptr_eq(p, &pass)) {
            log::trace!("Pass '{}' already queued", pass.name());
            return;
        }
        self.passes.push(pass);
    }

    /// Queued passes at `point`, in enqueue order
    pub fn passes_at(&self, point: InjectionPoint) -> impl Iterator<Item = &Arc<dyn RenderPass>> {
        self.passes
            .iter()
            .filter(move |p| p.injection_point() == point)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn RenderPass>> {
        self.passes.iter()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn clear(&mut self) {
        self.passes.clear();
    }
}

impl std::fmt::Debug for PassQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.passes.iter().map(|p| p.name()))
            .finish()
    }
}

//! Render pass definitions for the render graph

use thiserror::Error;

use crate::pipeline::InjectionPoint;
use crate::render_graph::frame::FrameResources;
use crate::render_graph::graph::FrameGraph;
use crate::render_graph::resource::*;
use crate::resources::MaterialHandle;

/// Unique identifier for a node in the render graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(pub(crate) u32);

impl PassId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A full-screen copy that runs every pixel through a material
#[derive(Debug, Clone)]
pub struct MaterialBlit {
    pub source: ResourceId,
    pub destination: ResourceId,
    pub material: MaterialHandle,
    pub subpass: u32,
    pub label: String,
}

/// Work performed by a graph node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A host pipeline stage drawing geometry into `target`
    Raster { target: ResourceId, clear: bool },
    MaterialBlit(MaterialBlit),
    /// Raw full-screen copy
    Copy {
        source: ResourceId,
        destination: ResourceId,
    },
}

/// A node in the graph
#[derive(Debug, Clone)]
pub struct PassNode {
    pub id: PassId,
    pub name: String,
    pub kind: NodeKind,
    pub inputs: Vec<ResourceAccess>,
    pub outputs: Vec<ResourceAccess>,
}

impl PassNode {
    pub fn reads_resource(&self, resource: ResourceId) -> bool {
        self.inputs.iter().any(|a| a.resource == resource)
    }

    pub fn writes_resource(&self, resource: ResourceId) -> bool {
        self.outputs.iter().any(|a| a.resource == resource)
    }
}

/// Why a pass recorded nothing this frame.
///
/// None of these are fatal; the host logs them and keeps the current color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    #[error(
        "pass '{pass}' needs an intermediate color texture, \
         but the camera renders straight into the back buffer"
    )]
    MissingIntermediateTarget { pass: String },
    #[error("pass '{pass}' has no tint material assigned")]
    MissingMaterial { pass: String },
    #[error("pass '{pass}' found no camera color in the frame resources")]
    NoActiveColor { pass: String },
    #[error("pass '{pass}' references unknown resource {resource}")]
    UnknownResource { pass: String, resource: ResourceId },
}

/// Trait for passes a renderer feature injects into the frame
pub trait RenderPass: Send + Sync {
    /// Get the pass name for debugging
    fn name(&self) -> &str;

    /// Where in the frame the host records this pass
    fn injection_point(&self) -> InjectionPoint;

    /// The pass samples the camera color and therefore cannot run while the
    /// camera renders straight into the back buffer.
    fn requires_intermediate_texture(&self) -> bool {
        false
    }

    /// Declare this frame's work on `graph`.
    ///
    /// Only builds the graph; nothing executes on the GPU here. Hosts call
    /// [`record_pass`] rather than this method so the declared requirements
    /// are checked first.
    fn record(
        &self,
        graph: &mut dyn FrameGraph,
        frame: &mut FrameResources,
    ) -> Result<(), PassError>;
}

/// Record `pass` after checking the requirements it declares.
///
/// On error nothing has been added to `graph` or `frame`.
pub fn record_pass(
    pass: &dyn RenderPass,
    graph: &mut dyn FrameGraph,
    frame: &mut FrameResources,
) -> Result<(), PassError> {
    if pass.requires_intermediate_texture() {
        let active = frame.active_color().ok_or_else(|| PassError::NoActiveColor {
            pass: pass.name().to_string(),
        })?;

        if active.is_back_buffer {
            return Err(PassError::MissingIntermediateTarget {
                pass: pass.name().to_string(),
            });
        }
    }

    pass.record(graph, frame)
}

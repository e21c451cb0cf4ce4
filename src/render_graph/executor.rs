//! Render graph executor

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::render_graph::graph::*;
use crate::render_graph::pass::*;
use crate::render_graph::resource::*;

/// Executor for running the compiled render graph
///
/// Textures are frame-local: [`cleanup`](Self::cleanup) destroys everything
/// allocated for the frame and nothing is carried over to the next one.
#[derive(Debug, Default)]
pub struct RenderGraphExecutor {
    /// Allocated textures mapped by resource ID
    allocated_textures: HashMap<ResourceId, TextureHandle>,

    /// External textures (like the back buffer)
    external_textures: HashMap<ResourceId, TextureHandle>,
}

impl RenderGraphExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an external texture (e.g., the back buffer image)
    pub fn set_external_texture(&mut self, resource: ResourceId, texture: TextureHandle) {
        self.external_textures.insert(resource, texture);
    }

    /// Allocate the graph-owned textures that a scheduled pass touches
    pub fn allocate_resources<B: GraphicsBackend>(
        &mut self,
        graph: &RenderGraph,
        compiled: &CompiledGraph,
        backend: &mut B,
    ) -> BackendResult<()> {
        for resource in graph.resources() {
            let VirtualResource::Texture(tex) = resource else {
                // External resources are set via set_external_texture
                continue;
            };

            if !compiled.is_resource_used(tex.id) {
                log::trace!("Skipping allocation of unused texture '{}'", tex.name);
                continue;
            }

            if !self.allocated_textures.contains_key(&tex.id) {
                let handle = backend.create_texture(&tex.desc)?;
                self.allocated_textures.insert(tex.id, handle);
            }
        }

        Ok(())
    }

    /// Backing texture of a resource, if any
    pub fn texture(&self, resource: ResourceId) -> Option<TextureHandle> {
        self.allocated_textures
            .get(&resource)
            .or_else(|| self.external_textures.get(&resource))
            .copied()
    }

    fn require(&self, graph: &RenderGraph, resource: ResourceId) -> BackendResult<TextureHandle> {
        self.texture(resource).ok_or_else(|| {
            let name = graph
                .get_resource(resource)
                .map(|r| r.name().to_string())
                .unwrap_or_else(|| resource.to_string());
            BackendError::ResourceNotAllocated(name)
        })
    }

    /// Execute the render graph
    pub fn execute<B: GraphicsBackend>(
        &self,
        graph: &RenderGraph,
        compiled: &CompiledGraph,
        backend: &mut B,
    ) -> BackendResult<()> {
        for &pass_id in &compiled.pass_order {
            let Some(node) = graph.get_pass_node(pass_id) else {
                continue;
            };

            match &node.kind {
                NodeKind::Raster { target, clear } => {
                    let target = self.require(graph, *target)?;
                    backend.draw_stage(&node.name, target, *clear)?;
                }
                NodeKind::MaterialBlit(blit) => {
                    let source = self.require(graph, blit.source)?;
                    let destination = self.require(graph, blit.destination)?;
                    backend.blit(
                        source,
                        destination,
                        Some(blit.material.as_ref()),
                        blit.subpass,
                        &blit.label,
                    )?;
                }
                NodeKind::Copy {
                    source,
                    destination,
                } => {
                    let source = self.require(graph, *source)?;
                    let destination = self.require(graph, *destination)?;
                    backend.blit(source, destination, None, 0, &node.name)?;
                }
            }
        }

        Ok(())
    }

    /// Release every frame-local texture
    pub fn cleanup<B: GraphicsBackend>(&mut self, backend: &mut B) {
        for (_, handle) in self.allocated_textures.drain() {
            backend.destroy_texture(handle);
        }

        self.external_textures.clear();
    }
}

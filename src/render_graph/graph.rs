//! Render graph definition and compilation

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::backend::types::TextureDescriptor;
use crate::render_graph::pass::*;
use crate::render_graph::resource::*;

/// The graph operations available to a pass while it records.
pub trait FrameGraph {
    /// Descriptor of an existing texture resource
    fn describe_texture(&self, resource: ResourceId) -> Option<&TextureDescriptor>;

    /// Declare a new texture that lives for this frame only
    fn create_texture(&mut self, name: &str, desc: TextureDescriptor) -> ResourceId;

    /// Schedule a material blit. The work runs when the graph executes.
    fn add_material_blit(&mut self, blit: MaterialBlit) -> PassId;
}

/// The main render graph structure
///
/// One graph describes one frame. Pass ids double as declaration indices.
#[derive(Debug, Default)]
pub struct RenderGraph {
    pass_nodes: Vec<PassNode>,
    resources: Vec<VirtualResource>,

    /// External resources (like the back buffer)
    external_resources: HashMap<String, ResourceId>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_resource_id(&self) -> ResourceId {
        ResourceId(self.resources.len() as u32)
    }

    /// Register the presentation buffer. It can be written but not sampled.
    pub fn import_back_buffer(&mut self, name: &str, desc: TextureDescriptor) -> ResourceId {
        let id = self.next_resource_id();
        self.resources.push(VirtualResource::BackBuffer(VirtualTexture {
            id,
            desc,
            name: name.to_string(),
        }));
        self.external_resources.insert(name.to_string(), id);
        id
    }

    /// Get external resource by name
    pub fn get_external(&self, name: &str) -> Option<ResourceId> {
        self.external_resources.get(name).copied()
    }

    /// Add a pipeline stage that draws into `target`.
    ///
    /// With `load` set the stage keeps the previous contents and therefore
    /// depends on whoever wrote `target` before it.
    pub fn add_raster_pass(&mut self, name: &str, target: ResourceId, load: bool) -> PassId {
        let mut inputs = Vec::new();
        if load {
            inputs.push(ResourceAccess {
                resource: target,
                usage: ResourceUsage::RenderTarget,
            });
        }

        self.push_node(
            name,
            NodeKind::Raster {
                target,
                clear: !load,
            },
            inputs,
            vec![ResourceAccess {
                resource: target,
                usage: ResourceUsage::RenderTarget,
            }],
        )
    }

    /// Add a raw full-screen copy
    pub fn add_copy(&mut self, name: &str, source: ResourceId, destination: ResourceId) -> PassId {
        self.push_node(
            name,
            NodeKind::Copy {
                source,
                destination,
            },
            vec![ResourceAccess {
                resource: source,
                usage: ResourceUsage::CopySrc,
            }],
            vec![ResourceAccess {
                resource: destination,
                usage: ResourceUsage::CopyDst,
            }],
        )
    }

    fn push_node(
        &mut self,
        name: &str,
        kind: NodeKind,
        inputs: Vec<ResourceAccess>,
        outputs: Vec<ResourceAccess>,
    ) -> PassId {
        let id = PassId(self.pass_nodes.len() as u32);
        self.pass_nodes.push(PassNode {
            id,
            name: name.to_string(),
            kind,
            inputs,
            outputs,
        });
        id
    }

    /// Compile the graph: cull unused work, order passes, compute lifetimes
    pub fn compile(&self) -> CompiledGraph {
        let count = self.pass_nodes.len();

        // Cull backwards from the external resources. A pass survives if it
        // writes something a later survivor (or the outside world) needs.
        let mut needed: HashSet<ResourceId> = self.external_resources.values().copied().collect();
        let mut alive = vec![false; count];

        for (index, node) in self.pass_nodes.iter().enumerate().rev() {
            if !node.outputs.iter().any(|a| needed.contains(&a.resource)) {
                continue;
            }
            alive[index] = true;

            for output in &node.outputs {
                if !node.reads_resource(output.resource) {
                    needed.remove(&output.resource);
                }
            }
            needed.extend(node.inputs.iter().map(|a| a.resource));
        }

        // Dependencies only point backwards in declaration order, so the
        // declared order is always a valid schedule.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut in_degree = vec![0usize; count];

        for later in 0..count {
            if !alive[later] {
                continue;
            }
            for earlier in 0..later {
                if !alive[earlier] {
                    continue;
                }
                if Self::conflicts(&self.pass_nodes[earlier], &self.pass_nodes[later]) {
                    dependents[earlier].push(later);
                    in_degree[later] += 1;
                }
            }
        }

        // Kahn's algorithm, lowest declaration index first
        let mut ready: BTreeSet<usize> = (0..count)
            .filter(|&i| alive[i] && in_degree[i] == 0)
            .collect();
        let mut pass_order = Vec::new();

        while let Some(index) = ready.pop_first() {
            pass_order.push(self.pass_nodes[index].id);

            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        let culled_passes: Vec<PassId> = self
            .pass_nodes
            .iter()
            .filter(|node| !alive[node.id.index()])
            .map(|node| node.id)
            .collect();

        // Determine resource lifetimes
        let mut resource_lifetimes: HashMap<ResourceId, ResourceLifetime> = HashMap::new();

        for (order, &pass_id) in pass_order.iter().enumerate() {
            let node = &self.pass_nodes[pass_id.index()];

            for access in node.inputs.iter().chain(node.outputs.iter()) {
                let lifetime = resource_lifetimes
                    .entry(access.resource)
                    .or_insert(ResourceLifetime {
                        first_use: order,
                        last_use: order,
                    });
                lifetime.last_use = order;
            }
        }

        log::debug!(
            "Compiled render graph: {} passes scheduled, {} culled, {} resources alive",
            pass_order.len(),
            culled_passes.len(),
            resource_lifetimes.len()
        );

        CompiledGraph {
            pass_order,
            culled_passes,
            resource_lifetimes,
        }
    }

    /// Whether `later` must run after `earlier`: read-after-write,
    /// write-after-write or write-after-read on a shared resource.
    fn conflicts(earlier: &PassNode, later: &PassNode) -> bool {
        let read_after_write = later.inputs.iter().any(|a| earlier.writes_resource(a.resource));
        let write_after_any = later
            .outputs
            .iter()
            .any(|a| earlier.writes_resource(a.resource) || earlier.reads_resource(a.resource));
        read_after_write || write_after_any
    }

    /// Get pass nodes in declaration order
    pub fn pass_nodes(&self) -> &[PassNode] {
        &self.pass_nodes
    }

    /// Get pass node by ID
    pub fn get_pass_node(&self, id: PassId) -> Option<&PassNode> {
        self.pass_nodes.get(id.index())
    }

    /// Get all resources
    pub fn resources(&self) -> &[VirtualResource] {
        &self.resources
    }

    pub fn get_resource(&self, id: ResourceId) -> Option<&VirtualResource> {
        self.resources.get(id.0 as usize)
    }

    /// Drop everything so the graph can be rebuilt for the next frame
    pub fn clear(&mut self) {
        self.pass_nodes.clear();
        self.resources.clear();
        self.external_resources.clear();
    }
}

impl FrameGraph for RenderGraph {
    fn describe_texture(&self, resource: ResourceId) -> Option<&TextureDescriptor> {
        self.get_resource(resource).map(VirtualResource::descriptor)
    }

    fn create_texture(&mut self, name: &str, mut desc: TextureDescriptor) -> ResourceId {
        if desc.label.is_none() {
            desc.label = Some(name.to_string());
        }

        let id = self.next_resource_id();
        self.resources.push(VirtualResource::Texture(VirtualTexture {
            id,
            desc,
            name: name.to_string(),
        }));
        id
    }

    fn add_material_blit(&mut self, blit: MaterialBlit) -> PassId {
        let name = blit.label.clone();
        let inputs = vec![ResourceAccess {
            resource: blit.source,
            usage: ResourceUsage::TextureRead,
        }];
        let outputs = vec![ResourceAccess {
            resource: blit.destination,
            usage: ResourceUsage::RenderTarget,
        }];
        self.push_node(&name, NodeKind::MaterialBlit(blit), inputs, outputs)
    }
}

/// Resource lifetime in terms of pass execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLifetime {
    pub first_use: usize,
    pub last_use: usize,
}

/// Compiled render graph with execution order and resource lifetimes
#[derive(Debug)]
pub struct CompiledGraph {
    pub pass_order: Vec<PassId>,
    pub culled_passes: Vec<PassId>,
    pub resource_lifetimes: HashMap<ResourceId, ResourceLifetime>,
}

impl CompiledGraph {
    /// Check if a resource is alive at a given execution step
    pub fn is_resource_alive(&self, resource: ResourceId, step: usize) -> bool {
        if let Some(lifetime) = self.resource_lifetimes.get(&resource) {
            step >= lifetime.first_use && step <= lifetime.last_use
        } else {
            false
        }
    }

    /// Whether any scheduled pass touches `resource`
    pub fn is_resource_used(&self, resource: ResourceId) -> bool {
        self.resource_lifetimes.contains_key(&resource)
    }

    pub fn is_culled(&self, pass: PassId) -> bool {
        self.culled_passes.contains(&pass)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::types::{TextureFormat, TextureUsage};
    use crate::resources::Material;

    fn back_buffer_desc() -> TextureDescriptor {
        TextureDescriptor::new_2d(
            320,
            240,
            TextureFormat::Bgra8UnormSrgb,
            TextureUsage::RENDER_ATTACHMENT,
        )
    }

    fn color_desc() -> TextureDescriptor {
        TextureDescriptor::color_target(320, 240, TextureFormat::Rgba8Unorm)
    }

    #[test]
    fn test_create_texture_sets_label() {
        let mut graph = RenderGraph::new();
        let id = graph.create_texture("color", color_desc());
        assert_eq!(
            graph.describe_texture(id).unwrap().label.as_deref(),
            Some("color")
        );
        assert_eq!(graph.get_resource(id).unwrap().name(), "color");
    }

    #[test]
    fn test_describe_unknown_resource() {
        let graph = RenderGraph::new();
        assert!(graph.describe_texture(ResourceId(3)).is_none());
    }

    #[test]
    fn test_import_back_buffer() {
        let mut graph = RenderGraph::new();
        let id = graph.import_back_buffer("back_buffer", back_buffer_desc());
        assert_eq!(graph.get_external("back_buffer"), Some(id));
        assert!(graph.get_resource(id).unwrap().is_external());
    }

    #[test]
    fn test_compile_keeps_declaration_order() {
        let mut graph = RenderGraph::new();
        let back_buffer = graph.import_back_buffer("back_buffer", back_buffer_desc());
        let color = graph.create_texture("color", color_desc());

        let opaque = graph.add_raster_pass("Opaque", color, false);
        let transparent = graph.add_raster_pass("Transparent", color, true);
        let resolve = graph.add_copy("Final Blit", color, back_buffer);

        let compiled = graph.compile();
        assert_eq!(compiled.pass_order, vec![opaque, transparent, resolve]);
        assert!(compiled.culled_passes.is_empty());
    }

    #[test]
    fn test_compile_culls_unread_output() {
        let mut graph = RenderGraph::new();
        let back_buffer = graph.import_back_buffer("back_buffer", back_buffer_desc());
        let color = graph.create_texture("color", color_desc());
        let scratch = graph.create_texture("scratch", color_desc());

        let opaque = graph.add_raster_pass("Opaque", color, false);
        let orphan = graph.add_raster_pass("Orphan", scratch, false);
        let resolve = graph.add_copy("Final Blit", color, back_buffer);

        let compiled = graph.compile();
        assert_eq!(compiled.pass_order, vec![opaque, resolve]);
        assert!(compiled.is_culled(orphan));
        assert!(!compiled.is_resource_used(scratch));
    }

    #[test]
    fn test_compile_culls_overwritten_clear() {
        let mut graph = RenderGraph::new();
        let back_buffer = graph.import_back_buffer("back_buffer", back_buffer_desc());

        let first = graph.add_raster_pass("First", back_buffer, false);
        let second = graph.add_raster_pass("Second", back_buffer, false);

        let compiled = graph.compile();
        assert_eq!(compiled.pass_order, vec![second]);
        assert!(compiled.is_culled(first));
    }

    #[test]
    fn test_material_blit_dependencies() {
        let mut graph = RenderGraph::new();
        let back_buffer = graph.import_back_buffer("back_buffer", back_buffer_desc());
        let color = graph.create_texture("color", color_desc());
        let tinted = graph.create_texture("tinted", color_desc().with_clear_on_bind(false));

        let opaque = graph.add_raster_pass("Opaque", color, false);
        let blit = graph.add_material_blit(MaterialBlit {
            source: color,
            destination: tinted,
            material: Arc::new(Material::new("tint")),
            subpass: 0,
            label: "Tint".to_string(),
        });
        let transparent = graph.add_raster_pass("Transparent", tinted, true);
        let resolve = graph.add_copy("Final Blit", tinted, back_buffer);

        let compiled = graph.compile();
        assert_eq!(compiled.pass_order, vec![opaque, blit, transparent, resolve]);

        let node = graph.get_pass_node(blit).unwrap();
        assert!(node.reads_resource(color));
        assert!(node.writes_resource(tinted));
        assert!(!node.writes_resource(color));

        assert_eq!(
            compiled.resource_lifetimes[&color],
            ResourceLifetime {
                first_use: 0,
                last_use: 1
            }
        );
        assert!(compiled.is_resource_alive(tinted, 2));
        assert!(!compiled.is_resource_alive(color, 3));
    }

    #[test]
    fn test_clear() {
        let mut graph = RenderGraph::new();
        let color = graph.create_texture("color", color_desc());
        graph.add_raster_pass("Opaque", color, false);

        graph.clear();

        assert!(graph.pass_nodes().is_empty());
        assert!(graph.resources().is_empty());
    }
}

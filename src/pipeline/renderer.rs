//! Host renderer: owns the features and records each camera's frame

use crate::backend::types::TextureDescriptor;
use crate::feature::RendererFeature;
use crate::pipeline::{InjectionPoint, IntermediateTextureMode, PassQueue};
use crate::render_graph::{record_pass, FrameGraph, FrameResources, RenderGraph};
use crate::scene::Camera;
use crate::RendererConfig;

/// External name of the back buffer in the graph
pub const BACK_BUFFER: &str = "back_buffer";
/// Name of the intermediate camera color texture
pub const CAMERA_COLOR_ATTACHMENT: &str = "_CameraColorAttachment";

pub const OPAQUE_STAGE: &str = "Opaque";
pub const TRANSPARENT_STAGE: &str = "Transparent";
pub const FINAL_BLIT: &str = "Final Blit";

pub struct Renderer {
    config: RendererConfig,
    features: Vec<Box<dyn RendererFeature>>,
    queue: PassQueue,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            features: Vec::new(),
            queue: PassQueue::new(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Register a feature and create its passes
    pub fn add_feature(&mut self, mut feature: Box<dyn RendererFeature>) {
        log::info!("{}: adding feature '{}'", self.config.name, feature.name());
        feature.create();
        self.features.push(feature);
    }

    pub fn features(&self) -> &[Box<dyn RendererFeature>] {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut [Box<dyn RendererFeature>] {
        &mut self.features
    }

    /// Re-create every feature's passes, e.g. after the pipeline settings change
    pub fn recreate_features(&mut self) {
        for feature in &mut self.features {
            feature.create();
        }
        self.queue.clear();
    }

    /// Collect the passes every feature wants for `camera`
    pub fn setup_camera(&mut self, camera: &Camera) {
        self.queue.clear();
        for feature in &self.features {
            feature.add_render_passes(&mut self.queue, camera);
        }
        log::debug!(
            "{}: camera '{}' queued {:?}",
            self.config.name,
            camera.name,
            self.queue
        );
    }

    pub fn queue(&self) -> &PassQueue {
        &self.queue
    }

    /// Whether this frame renders into an intermediate color texture
    pub fn uses_intermediate_texture(&self) -> bool {
        match self.config.intermediate_texture {
            IntermediateTextureMode::Always => true,
            IntermediateTextureMode::Never => false,
            IntermediateTextureMode::Auto => {
                self.queue.iter().any(|p| p.requires_intermediate_texture())
            }
        }
    }

    /// Record one frame for `camera` into `graph`.
    ///
    /// Returns the frame resource table as the last pass left it.
    pub fn record_frame(&self, camera: &Camera, graph: &mut RenderGraph) -> FrameResources {
        let mut frame = FrameResources::new();

        let back_buffer = graph.import_back_buffer(BACK_BUFFER, camera.back_buffer_descriptor());
        frame.set_back_buffer(back_buffer);

        let color = if self.uses_intermediate_texture() {
            let desc = TextureDescriptor::color_target(
                camera.width,
                camera.height,
                self.config.color_format,
            );
            graph.create_texture(CAMERA_COLOR_ATTACHMENT, desc)
        } else {
            back_buffer
        };
        frame.set_active_color(color);

        self.record_passes(InjectionPoint::BeforeOpaque, graph, &mut frame);
        self.record_stage(OPAQUE_STAGE, false, graph, &frame);
        self.record_passes(InjectionPoint::AfterOpaque, graph, &mut frame);
        self.record_passes(InjectionPoint::BeforeTransparent, graph, &mut frame);
        self.record_stage(TRANSPARENT_STAGE, true, graph, &frame);
        self.record_passes(InjectionPoint::AfterTransparent, graph, &mut frame);

        if let Some(active) = frame.active_color() {
            if !active.is_back_buffer {
                graph.add_copy(FINAL_BLIT, active.resource, back_buffer);
            }
        }

        frame
    }

    fn record_stage(
        &self,
        name: &str,
        load: bool,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) {
        if let Some(active) = frame.active_color() {
            graph.add_raster_pass(name, active.resource, load);
        }
    }

    fn record_passes(
        &self,
        point: InjectionPoint,
        graph: &mut RenderGraph,
        frame: &mut FrameResources,
    ) {
        for pass in self.queue.passes_at(point) {
            if let Err(err) = record_pass(&**pass, graph, frame) {
                log::warn!("{}: skipping pass this frame: {}", self.config.name, err);
            }
        }
    }
}

//! Tint post-processing
//!
//! Copies the camera color into a fresh texture through the tint material and
//! makes that texture the camera color for the rest of the frame. The source
//! texture is never modified.

use parking_lot::RwLock;

use crate::pipeline::InjectionPoint;
use crate::render_graph::*;
use crate::resources::MaterialHandle;

pub const DEFAULT_TINT_PASS_NAME: &str = "Tint";

/// Tint post-processing pass
///
/// The material may be assigned or replaced after construction; it is checked
/// every time the pass records.
pub struct TintPass {
    name: String,
    material: RwLock<Option<MaterialHandle>>,
}

impl TintPass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: RwLock::new(None),
        }
    }

    pub fn with_material(self, material: MaterialHandle) -> Self {
        self.set_material(Some(material));
        self
    }

    pub fn set_material(&self, material: Option<MaterialHandle>) {
        *self.material.write() = material;
    }

    pub fn material(&self) -> Option<MaterialHandle> {
        self.material.read().clone()
    }

    /// Name of the texture this pass renders into
    pub fn destination_name(&self) -> String {
        format!("CameraColor-{}", self.name)
    }
}

impl Default for TintPass {
    fn default() -> Self {
        Self::new(DEFAULT_TINT_PASS_NAME)
    }
}

impl std::fmt::Debug for TintPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TintPass")
            .field("name", &self.name)
            .field("material", &self.material().map(|m| m.name.clone()))
            .finish()
    }
}

impl RenderPass for TintPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn injection_point(&self) -> InjectionPoint {
        InjectionPoint::AfterOpaque
    }

    fn requires_intermediate_texture(&self) -> bool {
        true
    }

    fn record(
        &self,
        graph: &mut dyn FrameGraph,
        frame: &mut FrameResources,
    ) -> Result<(), PassError> {
        let Some(material) = self.material() else {
            return Err(PassError::MissingMaterial {
                pass: self.name.clone(),
            });
        };

        let active = frame.active_color().ok_or_else(|| PassError::NoActiveColor {
            pass: self.name.clone(),
        })?;
        // The back buffer cannot be sampled
        if active.is_back_buffer {
            return Err(PassError::MissingIntermediateTarget {
                pass: self.name.clone(),
            });
        }
        let source = active.resource;

        // The blit writes every pixel, so the destination is never cleared
        let destination_name = self.destination_name();
        let desc = graph
            .describe_texture(source)
            .ok_or_else(|| PassError::UnknownResource {
                pass: self.name.clone(),
                resource: source,
            })?
            .derive()
            .with_label(destination_name.as_str())
            .with_clear_on_bind(false);

        let destination = graph.create_texture(&destination_name, desc);
        graph.add_material_blit(MaterialBlit {
            source,
            destination,
            material,
            subpass: 0,
            label: self.name.clone(),
        });

        frame.set_active_color(destination);
        Ok(())
    }
}

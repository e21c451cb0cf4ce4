//! Virtual resources for the render graph

use std::fmt;

use crate::backend::types::*;

/// Unique identifier for a render graph resource
///
/// Only valid within the graph that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Virtual texture resource in the render graph
#[derive(Debug, Clone)]
pub struct VirtualTexture {
    pub id: ResourceId,
    pub desc: TextureDescriptor,
    pub name: String,
}

/// Resource type enumeration
#[derive(Debug, Clone)]
pub enum VirtualResource {
    /// Texture owned by the graph for this frame only
    Texture(VirtualTexture),
    /// The final presentation buffer, owned outside the graph.
    /// It can be written but never sampled.
    BackBuffer(VirtualTexture),
}

impl VirtualResource {
    pub fn id(&self) -> ResourceId {
        match self {
            VirtualResource::Texture(t) | VirtualResource::BackBuffer(t) => t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VirtualResource::Texture(t) | VirtualResource::BackBuffer(t) => &t.name,
        }
    }

    pub fn descriptor(&self) -> &TextureDescriptor {
        match self {
            VirtualResource::Texture(t) | VirtualResource::BackBuffer(t) => &t.desc,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, VirtualResource::BackBuffer(_))
    }
}

/// How a pass uses a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUsage {
    /// Read as a texture (sampled)
    TextureRead,
    /// Write as a render target
    RenderTarget,
    /// Source of a raw copy
    CopySrc,
    /// Destination of a raw copy
    CopyDst,
}

/// Resource access declaration for a pass
#[derive(Debug, Clone)]
pub struct ResourceAccess {
    pub resource: ResourceId,
    pub usage: ResourceUsage,
}

impl TextureDescriptor {
    /// Start a descriptor for a new texture shaped like this one.
    ///
    /// Extent, format and mip count are kept. The label is dropped so the new
    /// resource gets its own identity, and the usage always allows the texture
    /// to be rendered to and sampled afterwards.
    pub fn derive(&self) -> TextureDescriptor {
        TextureDescriptor {
            label: None,
            usage: self.usage | TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
            ..self.clone()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_clear_on_bind(mut self, clear_on_bind: bool) -> Self {
        self.clear_on_bind = clear_on_bind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_preserves_shape() {
        for (width, height, format) in [
            (1920, 1080, TextureFormat::Rgba8Unorm),
            (1, 1, TextureFormat::Rgba16Float),
            (3840, 2160, TextureFormat::Bgra8UnormSrgb),
        ] {
            let source = TextureDescriptor::color_target(width, height, format)
                .with_label("_CameraColorAttachment");

            let derived = source
                .derive()
                .with_label("CameraColor-Tint")
                .with_clear_on_bind(false);

            assert_eq!(derived.width, width);
            assert_eq!(derived.height, height);
            assert_eq!(derived.format, format);
            assert_eq!(derived.mip_levels, source.mip_levels);
            assert_ne!(derived.label, source.label);
            assert!(!derived.clear_on_bind);
        }
    }

    #[test]
    fn test_derive_drops_label() {
        let source = TextureDescriptor::color_target(64, 32, TextureFormat::Rgba8Unorm)
            .with_label("source");
        assert_eq!(source.derive().label, None);
    }

    #[test]
    fn test_derive_makes_texture_readable() {
        let back_buffer = TextureDescriptor::new_2d(
            64,
            64,
            TextureFormat::Bgra8UnormSrgb,
            TextureUsage::RENDER_ATTACHMENT,
        );
        let derived = back_buffer.derive();
        assert!(derived.usage.contains(TextureUsage::TEXTURE_BINDING));
        assert!(derived.usage.contains(TextureUsage::RENDER_ATTACHMENT));
    }

    #[test]
    fn test_resource_id_display() {
        assert_eq!(ResourceId(7).to_string(), "#7");
    }
}

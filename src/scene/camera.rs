//! Camera description

use crate::backend::types::*;

/// A camera as seen by the renderer: what it is called and the back buffer it
/// presents to.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Format of the back buffer the camera presents to
    pub back_buffer_format: TextureFormat,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            name: "Main Camera".to_string(),
            width: 1280,
            height: 720,
            back_buffer_format: TextureFormat::Bgra8UnormSrgb,
        }
    }
}

impl Camera {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_back_buffer_format(mut self, format: TextureFormat) -> Self {
        self.back_buffer_format = format;
        self
    }

    /// Descriptor of the presentation buffer. It is a render target only.
    pub fn back_buffer_descriptor(&self) -> TextureDescriptor {
        TextureDescriptor::new_2d(
            self.width,
            self.height,
            self.back_buffer_format,
            TextureUsage::RENDER_ATTACHMENT,
        )
        .with_label(format!("{} Back Buffer", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_buffer_not_sampleable() {
        let camera = Camera::new("Main", 1920, 1080);
        let desc = camera.back_buffer_descriptor();
        assert_eq!(desc.extent(), (1920, 1080));
        assert!(!desc.usage.contains(TextureUsage::TEXTURE_BINDING));
    }
}

//! Dummy backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It validates handles,
//! keeps track of live textures and records every command it receives so a
//! frame can be inspected after execution.

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::resources::Material;

/// Largest texture dimension the dummy device accepts
pub const DUMMY_MAX_TEXTURE_DIMENSION: u32 = 16384;

/// A command recorded by [`DummyBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    CreateTexture {
        handle: TextureHandle,
        desc: TextureDescriptor,
    },
    DestroyTexture(TextureHandle),
    DrawStage {
        label: String,
        target: TextureHandle,
        clear: bool,
    },
    Blit {
        source: TextureHandle,
        destination: TextureHandle,
        material: Option<String>,
        /// Uniform block the material was bound with
        uniform: Option<Vec<u8>>,
        subpass: u32,
        label: String,
    },
}

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    next_handle: u64,
    textures: HashMap<TextureHandle, TextureDescriptor>,
    commands: Vec<BackendCommand>,
    /// Device memory limit in bytes, unlimited when `None`
    memory_budget: Option<u64>,
}

impl DummyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail texture creation once live textures would exceed `bytes`
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Bytes held by live textures
    pub fn allocated_bytes(&self) -> u64 {
        self.textures.values().map(TextureDescriptor::size_in_bytes).sum()
    }

    /// Commands received so far, in submission order
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of textures currently alive
    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_descriptor(&self, handle: TextureHandle) -> Option<&TextureDescriptor> {
        self.textures.get(&handle)
    }

    fn check(&self, handle: TextureHandle) -> BackendResult<()> {
        if self.textures.contains_key(&handle) {
            Ok(())
        } else {
            Err(BackendError::InvalidTexture(handle))
        }
    }
}

impl GraphicsBackend for DummyBackend {
    fn name(&self) -> &str {
        "Dummy Backend"
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle> {
        if desc.width == 0 || desc.height == 0 {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?} has a zero extent",
                desc.label
            )));
        }
        if desc.width > DUMMY_MAX_TEXTURE_DIMENSION || desc.height > DUMMY_MAX_TEXTURE_DIMENSION {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?} exceeds {}x{}",
                desc.label, DUMMY_MAX_TEXTURE_DIMENSION, DUMMY_MAX_TEXTURE_DIMENSION
            )));
        }

        if let Some(budget) = self.memory_budget {
            let requested = desc.size_in_bytes();
            let available = budget.saturating_sub(self.allocated_bytes());
            if requested > available {
                return Err(BackendError::OutOfMemory {
                    requested,
                    available,
                });
            }
        }

        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;

        log::trace!(
            "DummyBackend: creating texture {:?} ({}x{}, {:?})",
            desc.label,
            desc.width,
            desc.height,
            desc.format
        );

        self.textures.insert(handle, desc.clone());
        self.commands.push(BackendCommand::CreateTexture {
            handle,
            desc: desc.clone(),
        });
        Ok(handle)
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_some() {
            log::trace!("DummyBackend: destroying texture {:?}", handle);
            self.commands.push(BackendCommand::DestroyTexture(handle));
        } else {
            log::warn!("DummyBackend: destroying unknown texture {:?}", handle);
        }
    }

    fn draw_stage(&mut self, label: &str, target: TextureHandle, clear: bool) -> BackendResult<()> {
        self.check(target)?;
        log::trace!("DummyBackend: draw stage '{}' into {:?}", label, target);
        self.commands.push(BackendCommand::DrawStage {
            label: label.to_string(),
            target,
            clear,
        });
        Ok(())
    }

    fn blit(
        &mut self,
        source: TextureHandle,
        destination: TextureHandle,
        material: Option<&Material>,
        subpass: u32,
        label: &str,
    ) -> BackendResult<()> {
        self.check(source)?;
        self.check(destination)?;
        log::trace!(
            "DummyBackend: blit '{}' {:?} -> {:?}",
            label,
            source,
            destination
        );
        self.commands.push(BackendCommand::Blit {
            source,
            destination,
            material: material.map(|m| m.name.clone()),
            uniform: material.map(|m| bytemuck::bytes_of(&m.uniform_data()).to_vec()),
            subpass,
            label: label.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_destroy() {
        let mut backend = DummyBackend::new();
        let desc = TextureDescriptor::color_target(64, 64, TextureFormat::Rgba8Unorm);
        let a = backend.create_texture(&desc).unwrap();
        let b = backend.create_texture(&desc).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_texture_count(), 2);

        backend.destroy_texture(a);
        assert_eq!(backend.live_texture_count(), 1);
        assert_eq!(backend.commands().len(), 3);
    }

    #[test]
    fn test_zero_extent_rejected() {
        let mut backend = DummyBackend::new();
        let desc = TextureDescriptor::color_target(0, 64, TextureFormat::Rgba8Unorm);
        assert!(matches!(
            backend.create_texture(&desc),
            Err(BackendError::TextureCreationFailed(_))
        ));
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn test_memory_budget() {
        let desc = TextureDescriptor::color_target(64, 64, TextureFormat::Rgba8Unorm);
        let mut backend = DummyBackend::new().with_memory_budget(desc.size_in_bytes() * 2);

        let first = backend.create_texture(&desc).unwrap();
        backend.create_texture(&desc).unwrap();
        assert_eq!(backend.allocated_bytes(), 64 * 64 * 4 * 2);

        let result = backend.create_texture(&desc);
        assert!(matches!(
            result,
            Err(BackendError::OutOfMemory { requested: 16384, available: 0 })
        ));

        // Freed memory can be reused
        backend.destroy_texture(first);
        assert!(backend.create_texture(&desc).is_ok());
    }

    #[test]
    fn test_blit_records_material_uniform() {
        let mut backend = DummyBackend::new();
        let desc = TextureDescriptor::color_target(8, 8, TextureFormat::Rgba8Unorm);
        let source = backend.create_texture(&desc).unwrap();
        let destination = backend.create_texture(&desc).unwrap();
        let material = Material::sepia().with_intensity(0.5);

        backend
            .blit(source, destination, Some(&material), 0, "Tint")
            .unwrap();
        backend.blit(source, destination, None, 0, "Copy").unwrap();

        let expected = bytemuck::bytes_of(&material.uniform_data()).to_vec();
        match &backend.commands()[2] {
            BackendCommand::Blit { material, uniform, .. } => {
                assert_eq!(material.as_deref(), Some("sepia"));
                assert_eq!(uniform.as_ref(), Some(&expected));
                assert_eq!(expected.len(), 32);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(matches!(
            &backend.commands()[3],
            BackendCommand::Blit { uniform: None, .. }
        ));
    }

    #[test]
    fn test_blit_unknown_texture() {
        let mut backend = DummyBackend::new();
        let desc = TextureDescriptor::color_target(8, 8, TextureFormat::Rgba8Unorm);
        let source = backend.create_texture(&desc).unwrap();
        let result = backend.blit(source, TextureHandle(99), None, 0, "copy");
        assert!(matches!(result, Err(BackendError::InvalidTexture(TextureHandle(99)))));
    }
}

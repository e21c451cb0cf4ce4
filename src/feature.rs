//! Renderer features
//!
//! A feature owns the passes it contributes and decides, per camera, which of
//! them the renderer records.

use std::sync::Arc;

use crate::pipeline::postprocess::{TintPass, DEFAULT_TINT_PASS_NAME};
use crate::pipeline::PassQueue;
use crate::resources::MaterialHandle;
use crate::scene::Camera;

/// Trait for pluggable renderer features
pub trait RendererFeature: Send + Sync {
    fn name(&self) -> &str;

    /// Build the feature's passes. Called when the pipeline is (re)initialized.
    fn create(&mut self);

    /// Append this feature's passes for `camera`.
    ///
    /// Must not do anything besides enqueuing passes.
    fn add_render_passes(&self, queue: &mut PassQueue, camera: &Camera);
}

/// Settings for [`TintFeature`]
#[derive(Debug, Clone)]
pub struct TintFeatureSettings {
    pub pass_name: String,
    pub material: Option<MaterialHandle>,
}

impl Default for TintFeatureSettings {
    fn default() -> Self {
        Self {
            pass_name: DEFAULT_TINT_PASS_NAME.to_string(),
            material: None,
        }
    }
}

impl TintFeatureSettings {
    pub fn with_pass_name(mut self, name: &str) -> Self {
        self.pass_name = name.to_string();
        self
    }

    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material = Some(material);
        self
    }
}

/// Injects one [`TintPass`] right after opaque geometry
#[derive(Debug)]
pub struct TintFeature {
    settings: TintFeatureSettings,
    pass: Option<Arc<TintPass>>,
}

impl TintFeature {
    pub fn new(settings: TintFeatureSettings) -> Self {
        Self {
            settings,
            pass: None,
        }
    }

    pub fn settings(&self) -> &TintFeatureSettings {
        &self.settings
    }

    /// The pass built by the last [`create`](RendererFeature::create)
    pub fn pass(&self) -> Option<&Arc<TintPass>> {
        self.pass.as_ref()
    }

    /// Swap the material. The live pass picks it up on its next frame.
    pub fn set_material(&mut self, material: Option<MaterialHandle>) {
        self.settings.material = material.clone();
        if let Some(pass) = &self.pass {
            pass.set_material(material);
        }
    }
}

impl RendererFeature for TintFeature {
    fn name(&self) -> &str {
        &self.settings.pass_name
    }

    fn create(&mut self) {
        let pass = TintPass::new(self.settings.pass_name.as_str());
        pass.set_material(self.settings.material.clone());
        self.pass = Some(Arc::new(pass));
    }

    fn add_render_passes(&self, queue: &mut PassQueue, camera: &Camera) {
        match &self.pass {
            Some(pass) => queue.enqueue(pass.clone()),
            None => log::warn!(
                "Tint feature '{}' was not created, nothing to add for camera '{}'",
                self.settings.pass_name,
                camera.name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::InjectionPoint;
    use crate::resources::Material;

    #[test]
    fn test_not_created_adds_nothing() {
        let feature = TintFeature::new(TintFeatureSettings::default());
        let mut queue = PassQueue::new();
        feature.add_render_passes(&mut queue, &Camera::default());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_pass_for_every_camera() {
        let mut feature = TintFeature::new(TintFeatureSettings::default());
        feature.create();

        let mut first = PassQueue::new();
        let mut second = PassQueue::new();
        feature.add_render_passes(&mut first, &Camera::new("Left", 640, 480));
        feature.add_render_passes(&mut second, &Camera::new("Right", 640, 480));

        let a = first.iter().next().unwrap();
        let b = second.iter().next().unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(a.injection_point(), InjectionPoint::AfterOpaque);
    }

    #[test]
    fn test_set_material_reaches_live_pass() {
        let settings = TintFeatureSettings::default().with_pass_name("Red Tint");
        let mut feature = TintFeature::new(settings);
        feature.create();
        assert!(feature.pass().unwrap().material().is_none());

        feature.set_material(Some(Material::new("red").into_handle()));
        assert_eq!(feature.pass().unwrap().material().unwrap().name, "red");

        // Re-creating keeps the material from the settings
        feature.create();
        assert_eq!(feature.pass().unwrap().material().unwrap().name, "red");
        assert_eq!(feature.name(), "Red Tint");
    }
}

//! Per-frame resource table shared by every pass recorded in a frame

use std::collections::HashMap;

use crate::render_graph::resource::ResourceId;

/// Table key of the camera color every pass should read and render into
pub const CAMERA_COLOR: &str = "camera_color";

/// The color resource passes currently target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveColor {
    pub resource: ResourceId,
    /// The resource is the final presentation buffer and cannot be sampled
    pub is_back_buffer: bool,
}

/// Maps semantic resource names to graph resources for one frame.
///
/// The host creates one table per frame and threads it through every pass.
/// Later passes observe earlier writes because they read the same table.
#[derive(Debug, Clone, Default)]
pub struct FrameResources {
    entries: HashMap<String, ResourceId>,
    back_buffer: Option<ResourceId>,
}

impl FrameResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_back_buffer(&mut self, resource: ResourceId) {
        self.back_buffer = Some(resource);
    }

    pub fn back_buffer(&self) -> Option<ResourceId> {
        self.back_buffer
    }

    /// Bind `name` to `resource`, returning the previous binding
    pub fn insert(&mut self, name: &str, resource: ResourceId) -> Option<ResourceId> {
        self.entries.insert(name.to_string(), resource)
    }

    pub fn get(&self, name: &str) -> Option<ResourceId> {
        self.entries.get(name).copied()
    }

    pub fn active_color(&self) -> Option<ActiveColor> {
        self.get(CAMERA_COLOR).map(|resource| ActiveColor {
            resource,
            is_back_buffer: self.back_buffer == Some(resource),
        })
    }

    /// Last writer wins.
    pub fn set_active_color(&mut self, resource: ResourceId) -> Option<ResourceId> {
        self.insert(CAMERA_COLOR, resource)
    }

    /// Whether any entry still refers to `resource`
    pub fn references(&self, resource: ResourceId) -> bool {
        self.entries.values().any(|&r| r == resource)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ResourceId)> {
        self.entries.iter().map(|(name, &id)| (name.as_str(), id))
    }
}

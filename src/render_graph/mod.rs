//! Render Graph System
//!
//! A declarative system for describing one frame as a directed acyclic graph
//! of passes and the resources they read and write. The graph handles resource
//! declaration, culling of unreferenced work, pass ordering and execution.

pub mod executor;
pub mod frame;
pub mod graph;
pub mod pass;
pub mod resource;

pub use executor::*;
pub use frame::*;
pub use graph::*;
pub use pass::*;
pub use resource::*;

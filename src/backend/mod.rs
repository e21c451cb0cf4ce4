//! Backend abstraction layer
//!
//! Provides the types shared by the frame graph and the trait a GPU backend
//! implements to execute a compiled graph.

pub mod dummy;
pub mod traits;
pub mod types;

pub use dummy::*;
pub use traits::*;
pub use types::*;

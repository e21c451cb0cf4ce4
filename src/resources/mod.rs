//! Resource management

pub mod material;

pub use material::*;

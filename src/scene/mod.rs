//! Scene types the renderer needs per frame

pub mod camera;

pub use camera::*;

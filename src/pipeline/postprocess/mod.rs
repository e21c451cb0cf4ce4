//! Post-processing effects

mod tint;

pub use tint::{TintPass, DEFAULT_TINT_PASS_NAME};

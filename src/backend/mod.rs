//! GPU backend abstraction layer.
//!
//! # Available Backends
//!
//! - `dummy` (always built): No GPU; reflects declarations straight out of the GLSL text
//! - `glow-backend`: OpenGL / OpenGL ES through `glow` (native only)

pub mod dummy;
#[cfg(all(feature = "glow-backend", not(target_arch = "wasm32")))]
pub mod glow_backend;
pub mod traits;
pub mod types;

pub use dummy::{DummyBackend, DummyStats};
#[cfg(all(feature = "glow-backend", not(target_arch = "wasm32")))]
pub use glow_backend::GlowBackend;
pub use traits::*;
pub use types::*;

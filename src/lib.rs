//! # Shader Program Cache
//!
//! Compiles vertex/fragment shader pairs into GPU programs and binds named data to
//! them.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`ShaderCompiler`] - Compiles each distinct source pair once and hands out
//!   ready-to-draw [`CompiledUnit`]s
//! - [`ProgramCache`] - Exact source-pair identity cache
//! - [`GpuBackend`] - Trait for the GPU API the compiler drives
//! - [`bindings`] - Uniform, attribute and element bindings synthesized from program
//!   reflection
//! - Backends: Dummy (for testing) and OpenGL through `glow` (feature `glow-backend`)
//!
//! ## Example
//!
//! ```
//! use shader_program_cache::{CompileRequest, DummyBackend, ShaderCompiler, TextureId};
//!
//! let mut compiler = ShaderCompiler::new(DummyBackend::new());
//! let unit = compiler
//!     .compile(
//!         CompileRequest::new(
//!             "uniform mat4 transform; attribute vec3 vertices; void main() {}",
//!             "uniform sampler2D diffuseMap; void main() {}",
//!         )
//!         .with_uniform("transform", glam::Mat4::IDENTITY)
//!         .with_uniform("diffuseMap", TextureId(1))
//!         .with_attribute("vertices", vec![0.0f32; 9])
//!         .with_elements([0u16, 1, 2]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(unit.uniform("diffuseMap").unwrap().texture_unit(), Some(0));
//! assert!(unit.is_complete());
//! ```

pub mod backend;
pub mod bindings;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod introspect;
pub mod program;

// Re-export main types for convenience
pub use backend::{
    ActiveSlot, DummyBackend, DummyStats, GlType, GpuBackend, RawProgram, RawShader,
    ShaderStage,
};
#[cfg(all(feature = "glow-backend", not(target_arch = "wasm32")))]
pub use backend::GlowBackend;
pub use bindings::{
    AttributeBinding, ElementBinding, ElementData, NamedValue, TextureId, UniformBinding,
    UniformValue,
};
pub use cache::ProgramCache;
pub use compiler::{CompileRequest, CompiledUnit, ShaderCompiler, SharedCompiler};
pub use config::CompilerConfig;
pub use diagnostics::{BindingKind, Diagnostic};
pub use error::{BackendError, CompileError, CompileResult};
pub use introspect::SlotDescriptor;
pub use program::{ProgramHandle, ShaderStageHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
///
/// Optional; the compiler works without it.
pub fn init() {
    log::info!("Shader Program Cache v{} initialized", VERSION);
}

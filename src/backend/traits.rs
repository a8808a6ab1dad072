//! Core backend abstraction trait
//!
//! This is the capability surface the compiler needs from a GPU context: shader and
//! program objects, compile/link status queries, and slot reflection. It mirrors the
//! GL program model, so every call is synchronous and takes `&self`.

use crate::backend::types::*;
use crate::error::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// GPU backend trait for compiling, linking and reflecting shader programs.
///
/// Implementations are bound to the thread that owns the underlying context, so the
/// trait carries no `Send`/`Sync` bound.
pub trait GpuBackend: 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    // Shader stages

    /// Allocate a shader object for the given stage.
    fn create_shader(&self, stage: ShaderStage) -> BackendResult<RawShader>;

    /// Submit source text for a shader object.
    fn shader_source(&self, shader: RawShader, source: &str);

    /// Compile a shader object.
    fn compile_shader(&self, shader: RawShader);

    /// Query whether the last compile succeeded.
    fn shader_compile_status(&self, shader: RawShader) -> bool;

    /// Fetch the compiler info log for a shader object.
    fn shader_info_log(&self, shader: RawShader) -> String;

    // Programs

    /// Allocate a program object.
    fn create_program(&self) -> BackendResult<RawProgram>;

    /// Attach a shader object to a program.
    fn attach_shader(&self, program: RawProgram, shader: RawShader);

    /// Link a program.
    fn link_program(&self, program: RawProgram);

    /// Query whether the last link succeeded.
    fn program_link_status(&self, program: RawProgram) -> bool;

    /// Fetch the linker info log for a program.
    fn program_info_log(&self, program: RawProgram) -> String;

    // Reflection

    /// Active uniform at `index`, or `None` past the last one.
    fn active_uniform(&self, program: RawProgram, index: u32) -> Option<ActiveSlot>;

    /// Active attribute at `index`, or `None` past the last one.
    fn active_attribute(&self, program: RawProgram, index: u32) -> Option<ActiveSlot>;

    /// Resolve a uniform location by name.
    fn uniform_location(&self, program: RawProgram, name: &str) -> Option<u32>;

    /// Resolve an attribute location by name.
    fn attribute_location(&self, program: RawProgram, name: &str) -> Option<u32>;

    /// Whether uniforms of this type consume a texture unit.
    fn is_sampler(&self, ty: GlType) -> bool {
        ty.is_sampler()
    }
}

//! OpenGL / OpenGL ES backend over `glow`.
//!
//! Raw handles are the GL object names. `glow` answers active-slot queries for any
//! index, so enumeration is bounded by `GL_ACTIVE_UNIFORMS` / `GL_ACTIVE_ATTRIBUTES`
//! to end the scan the way a null-returning driver would.

use std::num::NonZeroU32;

use glow::HasContext;

use super::traits::{BackendResult, GpuBackend};
use super::types::{ActiveSlot, GlType, RawProgram, RawShader, ShaderStage};
use crate::error::BackendError;

/// Backend driving a live GL context.
///
/// The context must be current on the calling thread for every call.
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        log::info!(
            "glow backend: {} ({})",
            unsafe { gl.get_parameter_string(glow::RENDERER) },
            unsafe { gl.get_parameter_string(glow::VERSION) }
        );
        Self { gl }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_context(self) -> glow::Context {
        self.gl
    }
}

fn native_shader(shader: RawShader) -> Option<glow::NativeShader> {
    NonZeroU32::new(shader.0).map(glow::NativeShader)
}

fn native_program(program: RawProgram) -> Option<glow::NativeProgram> {
    NonZeroU32::new(program.0).map(glow::NativeProgram)
}

fn shader_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn active_slot(size: i32, ty: u32, name: String) -> ActiveSlot {
    ActiveSlot::new(name, u32::try_from(size).unwrap_or(1), GlType(ty))
}

impl GpuBackend for GlowBackend {
    fn name(&self) -> &'static str {
        "OpenGL (glow)"
    }

    fn create_shader(&self, stage: ShaderStage) -> BackendResult<RawShader> {
        let shader = unsafe { self.gl.create_shader(shader_kind(stage)) }
            .map_err(BackendError::ShaderCreationFailed)?;
        Ok(RawShader(shader.0.get()))
    }

    fn shader_source(&self, shader: RawShader, source: &str) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.shader_source(shader, source) }
        }
    }

    fn compile_shader(&self, shader: RawShader) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.compile_shader(shader) }
        }
    }

    fn shader_compile_status(&self, shader: RawShader) -> bool {
        native_shader(shader).is_some_and(|s| unsafe { self.gl.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, shader: RawShader) -> String {
        native_shader(shader)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> BackendResult<RawProgram> {
        let program =
            unsafe { self.gl.create_program() }.map_err(BackendError::ProgramCreationFailed)?;
        Ok(RawProgram(program.0.get()))
    }

    fn attach_shader(&self, program: RawProgram, shader: RawShader) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn link_program(&self, program: RawProgram) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn program_link_status(&self, program: RawProgram) -> bool {
        native_program(program).is_some_and(|p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_info_log(&self, program: RawProgram) -> String {
        native_program(program)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn active_uniform(&self, program: RawProgram, index: u32) -> Option<ActiveSlot> {
        let program = native_program(program)?;
        unsafe {
            if index >= self.gl.get_active_uniforms(program) {
                return None;
            }
            self.gl
                .get_active_uniform(program, index)
                .map(|u| active_slot(u.size, u.utype, u.name))
        }
    }

    fn active_attribute(&self, program: RawProgram, index: u32) -> Option<ActiveSlot> {
        let program = native_program(program)?;
        unsafe {
            if index >= self.gl.get_active_attributes(program) {
                return None;
            }
            self.gl
                .get_active_attribute(program, index)
                .map(|a| active_slot(a.size, a.atype, a.name))
        }
    }

    fn uniform_location(&self, program: RawProgram, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn attribute_location(&self, program: RawProgram, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }
}

//! Shader stage compilation and program linking.
//!
//! Both steps follow the GL pattern: allocate an object, feed it, run the compiler or
//! linker, then query the status. A failed status is reported as a
//! [`Diagnostic`] and the handle is still returned, so the caller decides whether a
//! broken program is fatal. Only a failed allocation aborts.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::backend::{GpuBackend, RawProgram, RawShader, ShaderStage};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::CompileResult;

/// Hands out identifiers used to correlate handles in diagnostics.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One compiled shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStageHandle {
    id: u64,
    stage: ShaderStage,
    raw: RawShader,
    compiled: bool,
    info_log: String,
}

impl ShaderStageHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn raw(&self) -> RawShader {
        self.raw
    }

    /// Whether the backend reported a successful compile.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Compiler output. Empty on success for most drivers.
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    fn diagnostic(&self) -> Option<Diagnostic> {
        (!self.compiled).then(|| Diagnostic::StageCompile {
            stage: self.stage,
            shader_id: self.id,
            log: self.info_log.clone(),
        })
    }
}

#[derive(Debug)]
struct ProgramInner {
    id: u64,
    raw: RawProgram,
    vertex: ShaderStageHandle,
    fragment: ShaderStageHandle,
    linked: bool,
    info_log: String,
    /// -1 until attributes are extracted or when there are none.
    highest_attribute_index: AtomicI64,
}

/// Shared handle to a linked program.
///
/// Clones refer to the same program; use [`ProgramHandle::ptr_eq`] to test identity.
#[derive(Debug, Clone)]
pub struct ProgramHandle(Arc<ProgramInner>);

impl ProgramHandle {
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn raw(&self) -> RawProgram {
        self.0.raw
    }

    pub fn vertex(&self) -> &ShaderStageHandle {
        &self.0.vertex
    }

    pub fn fragment(&self) -> &ShaderStageHandle {
        &self.0.fragment
    }

    /// Whether the backend reported a successful link.
    pub fn is_linked(&self) -> bool {
        self.0.linked
    }

    pub fn info_log(&self) -> &str {
        &self.0.info_log
    }

    /// Highest active attribute index seen by the last attribute extraction.
    pub fn highest_attribute_index(&self) -> Option<u32> {
        let index = self.0.highest_attribute_index.load(Ordering::Acquire);
        u32::try_from(index).ok()
    }

    pub(crate) fn set_highest_attribute_index(&self, index: Option<u32>) {
        let value = index.map_or(-1, i64::from);
        self.0
            .highest_attribute_index
            .store(value, Ordering::Release);
    }

    /// Compile and link diagnostics raised when this program was built.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> =
            [self.0.vertex.diagnostic(), self.0.fragment.diagnostic()]
                .into_iter()
                .flatten()
                .collect();
        if !self.0.linked {
            diagnostics.push(self.link_diagnostic());
        }
        diagnostics
    }

    /// Whether both handles refer to the same program.
    pub fn ptr_eq(&self, other: &ProgramHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn link_diagnostic(&self) -> Diagnostic {
        Diagnostic::ProgramLink {
            program_id: self.0.id,
            log: self.0.info_log.clone(),
        }
    }
}

/// Compile one shader stage.
pub(crate) fn compile_stage<B: GpuBackend + ?Sized>(
    backend: &B,
    ids: &mut IdAllocator,
    stage: ShaderStage,
    source: &str,
    sink: &mut DiagnosticSink,
) -> CompileResult<ShaderStageHandle> {
    let raw = backend.create_shader(stage)?;
    let id = ids.allocate();

    backend.shader_source(raw, source);
    backend.compile_shader(raw);

    let compiled = backend.shader_compile_status(raw);
    let info_log = if compiled {
        String::new()
    } else {
        backend.shader_info_log(raw)
    };

    let handle = ShaderStageHandle {
        id,
        stage,
        raw,
        compiled,
        info_log,
    };
    match handle.diagnostic() {
        Some(diagnostic) => sink.push(diagnostic),
        None => log::trace!("compiled {} shader #{}", stage, id),
    }

    Ok(handle)
}

/// Attach both stages to a new program and link it.
pub(crate) fn link_program<B: GpuBackend + ?Sized>(
    backend: &B,
    ids: &mut IdAllocator,
    vertex: ShaderStageHandle,
    fragment: ShaderStageHandle,
    sink: &mut DiagnosticSink,
) -> CompileResult<ProgramHandle> {
    let raw = backend.create_program()?;
    let id = ids.allocate();

    backend.attach_shader(raw, vertex.raw);
    backend.attach_shader(raw, fragment.raw);
    backend.link_program(raw);

    let linked = backend.program_link_status(raw);
    let info_log = if linked {
        String::new()
    } else {
        backend.program_info_log(raw)
    };

    let program = ProgramHandle(Arc::new(ProgramInner {
        id,
        raw,
        vertex,
        fragment,
        linked,
        info_log,
        highest_attribute_index: AtomicI64::new(-1),
    }));
    if linked {
        log::debug!(
            "linked program #{} (vertex #{}, fragment #{})",
            id,
            program.vertex().id(),
            program.fragment().id()
        );
    } else {
        sink.push(program.link_diagnostic());
    }

    Ok(program)
}

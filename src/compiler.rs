//! Compile facade.
//!
//! [`ShaderCompiler::compile`] turns a [`CompileRequest`] into a [`CompiledUnit`]:
//! the program comes from the cache (or is compiled and linked on a miss), then the
//! program is reflected and the request's named values are bound to its slots.
//! Reflection and binding run on every call, so each unit owns a fresh set of
//! bindings even when the program is shared.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{GpuBackend, ShaderStage};
use crate::bindings::{
    create_attributes, create_elements, create_uniforms, AttributeBinding, ElementBinding,
    ElementData, NamedValue, UniformBinding, UniformValue,
};
use crate::cache::ProgramCache;
use crate::config::CompilerConfig;
use crate::diagnostics::{BindingKind, Diagnostic, DiagnosticSink};
use crate::error::CompileResult;
use crate::introspect::{extract_attributes, extract_uniforms};
use crate::program::{compile_stage, link_program, IdAllocator, ProgramHandle};

/// A compiler shared between threads. Lookup and insert run under one lock.
pub type SharedCompiler<B> = Arc<Mutex<ShaderCompiler<B>>>;

/// Shader sources plus the data to bind against the resulting program.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    vertex: String,
    fragment: String,
    values: HashMap<String, NamedValue>,
    elements: Option<ElementData>,
}

impl CompileRequest {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            values: HashMap::new(),
            elements: None,
        }
    }

    /// Supply raw data for the uniform `name`.
    pub fn with_uniform(self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.with_value(name, NamedValue::Uniform(value.into()))
    }

    /// Supply per-vertex data for the attribute `name`.
    pub fn with_attribute(self, name: impl Into<String>, data: impl Into<Arc<[f32]>>) -> Self {
        self.with_value(name, NamedValue::Attribute(data.into()))
    }

    /// Supply any named value, including pre-built bindings.
    ///
    /// A later value under the same name replaces the earlier one.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<NamedValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_elements(mut self, elements: impl Into<ElementData>) -> Self {
        self.elements = Some(elements.into());
        self
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment
    }
}

/// Everything needed to draw with a program.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    program: ProgramHandle,
    uniforms: HashMap<String, UniformBinding>,
    attributes: HashMap<String, AttributeBinding>,
    elements: ElementBinding,
    diagnostics: Vec<Diagnostic>,
}

impl CompiledUnit {
    pub fn program(&self) -> &ProgramHandle {
        &self.program
    }

    /// Uniform bindings by slot name.
    pub fn uniforms(&self) -> &HashMap<String, UniformBinding> {
        &self.uniforms
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformBinding> {
        self.uniforms.get(name)
    }

    /// Attribute bindings by slot name.
    pub fn attributes(&self) -> &HashMap<String, AttributeBinding> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeBinding> {
        self.attributes.get(name)
    }

    pub fn elements(&self) -> &ElementBinding {
        &self.elements
    }

    /// Every diagnostic raised while producing this unit, in the order raised.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the program linked and every active slot got a binding.
    ///
    /// A slot scan cut short by the configured cap counts as incomplete, since slots
    /// past the cap were never matched.
    pub fn is_complete(&self) -> bool {
        self.program.is_linked()
            && !self.diagnostics.iter().any(|d| {
                matches!(d, Diagnostic::SlotScanTruncated { .. })
                    || d.binding_name(BindingKind::Uniform).is_some()
                    || d.binding_name(BindingKind::Attribute).is_some()
            })
    }

    /// Names of active uniforms left unbound.
    pub fn missing_uniforms(&self) -> Vec<&str> {
        self.unbound(BindingKind::Uniform)
    }

    /// Names of active attributes left unbound.
    pub fn missing_attributes(&self) -> Vec<&str> {
        self.unbound(BindingKind::Attribute)
    }

    fn unbound(&self, kind: BindingKind) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| d.binding_name(kind))
            .collect()
    }
}

/// Compiles shader pairs at most once and binds request data to them.
pub struct ShaderCompiler<B: GpuBackend> {
    backend: B,
    config: CompilerConfig,
    cache: ProgramCache,
    ids: IdAllocator,
}

impl<B: GpuBackend> ShaderCompiler<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, CompilerConfig::default())
    }

    pub fn with_config(backend: B, config: CompilerConfig) -> Self {
        log::debug!(
            "shader compiler created on {} backend (max {} active slots)",
            backend.name(),
            config.max_active_slots
        );
        Self {
            backend,
            config,
            cache: ProgramCache::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Produce a ready-to-draw unit for `request`.
    ///
    /// Fails only when the backend cannot allocate an object or the request has no
    /// element data. Compile, link and binding problems are returned as diagnostics
    /// on the unit.
    pub fn compile(&mut self, request: CompileRequest) -> CompileResult<CompiledUnit> {
        let CompileRequest {
            vertex,
            fragment,
            mut values,
            elements,
        } = request;
        let mut sink = DiagnosticSink::new(self.config.missing_binding_level);

        let program = match self.cache.lookup(&vertex, &fragment) {
            Some(program) => {
                log::trace!("program cache hit: #{}", program.id());
                sink.extend_silent(program.diagnostics());
                program
            }
            None => {
                let program = self.build_program(&vertex, &fragment, &mut sink)?;
                self.cache.insert(vertex, fragment, program.clone());
                program
            }
        };

        let max_slots = self.config.max_active_slots;
        let uniform_slots = extract_uniforms(&self.backend, &program, max_slots, &mut sink);
        let attribute_slots = extract_attributes(&self.backend, &program, max_slots, &mut sink);

        let uniforms = create_uniforms(&self.backend, &uniform_slots, &mut values, &mut sink);
        let attributes = create_attributes(&attribute_slots, &mut values, &mut sink);
        if !values.is_empty() {
            let mut unused: Vec<&str> = values.keys().map(String::as_str).collect();
            unused.sort_unstable();
            log::debug!(
                "program #{}: no active slot for {}",
                program.id(),
                unused.join(", ")
            );
        }

        let elements = create_elements(elements, &mut sink)?;

        Ok(CompiledUnit {
            program,
            uniforms,
            attributes,
            elements,
            diagnostics: sink.into_vec(),
        })
    }

    fn build_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        sink: &mut DiagnosticSink,
    ) -> CompileResult<ProgramHandle> {
        let vertex = compile_stage(
            &self.backend,
            &mut self.ids,
            ShaderStage::Vertex,
            vertex,
            sink,
        )?;
        let fragment = compile_stage(
            &self.backend,
            &mut self.ids,
            ShaderStage::Fragment,
            fragment,
            sink,
        )?;
        link_program(&self.backend, &mut self.ids, vertex, fragment, sink)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    /// Forget every cached program, e.g. after the context was lost.
    pub fn clear_cache(&mut self) {
        log::debug!("clearing {} cached programs", self.cache.len());
        self.cache.clear();
    }

    /// Wrap the compiler for use from several threads.
    pub fn into_shared(self) -> SharedCompiler<B> {
        Arc::new(Mutex::new(self))
    }
}

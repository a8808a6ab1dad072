//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't talk to a GPU. It "compiles" GLSL by scanning the source for
//! `uniform`, `attribute` and vertex-stage `in` declarations, which is enough to drive
//! the full compile, reflect and bind path without a context. Every call is counted
//! so tests can check how often the compiler really hit the backend.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::Mutex;

use super::traits::{BackendResult, GpuBackend};
use super::types::{ActiveSlot, GlType, RawProgram, RawShader, ShaderStage};
use crate::error::BackendError;

/// Call counters collected by [`DummyBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DummyStats {
    pub shaders_created: u32,
    pub shader_compiles: u32,
    pub programs_created: u32,
    pub program_links: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Uniform,
    Attribute,
}

#[derive(Debug)]
struct DummyShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
    declarations: Vec<(SlotKind, ActiveSlot)>,
}

#[derive(Debug, Default)]
struct DummyProgram {
    attached: Vec<RawShader>,
    linked: bool,
    info_log: String,
    uniforms: Vec<ActiveSlot>,
    attributes: Vec<ActiveSlot>,
}

#[derive(Debug, Default)]
struct DummyState {
    shaders: Vec<DummyShader>,
    programs: Vec<DummyProgram>,
}

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    state: Mutex<DummyState>,
    context_lost: AtomicBool,
    shaders_created: AtomicU32,
    shader_compiles: AtomicU32,
    programs_created: AtomicU32,
    program_links: AtomicU32,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the call counters.
    pub fn stats(&self) -> DummyStats {
        DummyStats {
            shaders_created: self.shaders_created.load(Ordering::Relaxed),
            shader_compiles: self.shader_compiles.load(Ordering::Relaxed),
            programs_created: self.programs_created.load(Ordering::Relaxed),
            program_links: self.program_links.load(Ordering::Relaxed),
        }
    }

    /// Simulate losing the context: object creation fails until reset.
    pub fn set_context_lost(&self, lost: bool) {
        self.context_lost.store(lost, Ordering::Release);
    }

    fn check_context(&self) -> BackendResult<()> {
        if self.context_lost.load(Ordering::Acquire) {
            Err(BackendError::ContextLost)
        } else {
            Ok(())
        }
    }

    fn with_shader<R>(&self, shader: RawShader, f: impl FnOnce(&mut DummyShader) -> R) -> Option<R> {
        let mut state = self.state.lock();
        let index = (shader.0 as usize).checked_sub(1)?;
        state.shaders.get_mut(index).map(f)
    }

    fn with_program<R>(
        &self,
        program: RawProgram,
        f: impl FnOnce(&DummyProgram) -> R,
    ) -> Option<R> {
        let state = self.state.lock();
        let index = (program.0 as usize).checked_sub(1)?;
        state.programs.get(index).map(f)
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn create_shader(&self, stage: ShaderStage) -> BackendResult<RawShader> {
        self.check_context()?;
        let mut state = self.state.lock();
        state.shaders.push(DummyShader {
            stage,
            source: String::new(),
            compiled: false,
            info_log: String::new(),
            declarations: Vec::new(),
        });
        self.shaders_created.fetch_add(1, Ordering::Relaxed);
        let handle = RawShader(state.shaders.len() as u32);
        log::trace!("DummyBackend: created {} shader {:?}", stage, handle);
        Ok(handle)
    }

    fn shader_source(&self, shader: RawShader, source: &str) {
        self.with_shader(shader, |s| s.source = source.to_string());
    }

    fn compile_shader(&self, shader: RawShader) {
        self.shader_compiles.fetch_add(1, Ordering::Relaxed);
        self.with_shader(shader, |s| {
            match scan_declarations(s.stage, &s.source) {
                Ok(declarations) if has_entry_point(&s.source) => {
                    s.declarations = declarations;
                    s.compiled = true;
                    s.info_log.clear();
                }
                Ok(_) => {
                    s.compiled = false;
                    s.info_log = "ERROR: 0:0: 'main' : function not defined".to_string();
                }
                Err(log) => {
                    s.compiled = false;
                    s.info_log = log;
                }
            }
        });
    }

    fn shader_compile_status(&self, shader: RawShader) -> bool {
        self.with_shader(shader, |s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: RawShader) -> String {
        self.with_shader(shader, |s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn create_program(&self) -> BackendResult<RawProgram> {
        self.check_context()?;
        let mut state = self.state.lock();
        state.programs.push(DummyProgram::default());
        self.programs_created.fetch_add(1, Ordering::Relaxed);
        Ok(RawProgram(state.programs.len() as u32))
    }

    fn attach_shader(&self, program: RawProgram, shader: RawShader) {
        let mut state = self.state.lock();
        if let Some(p) = (program.0 as usize)
            .checked_sub(1)
            .and_then(|index| state.programs.get_mut(index))
        {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: RawProgram) {
        self.program_links.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock();
        let Some(index) = (program.0 as usize).checked_sub(1) else {
            return;
        };
        if index >= state.programs.len() {
            return;
        }

        let mut vertex = None;
        let mut fragment = None;
        let mut info_log = String::new();
        for shader in &state.programs[index].attached {
            let Some(s) = (shader.0 as usize)
                .checked_sub(1)
                .and_then(|i| state.shaders.get(i))
            else {
                continue;
            };
            if !s.compiled {
                info_log = format!("Attached {} shader is not compiled.", s.stage);
            }
            match s.stage {
                ShaderStage::Vertex => vertex = Some(s),
                ShaderStage::Fragment => fragment = Some(s),
            }
        }

        let (linked, uniforms, attributes) = match (vertex, fragment) {
            (Some(vs), Some(fs)) if info_log.is_empty() => {
                let mut uniforms: Vec<ActiveSlot> = Vec::new();
                let mut attributes = Vec::new();
                for (kind, slot) in vs.declarations.iter().chain(fs.declarations.iter()) {
                    match kind {
                        SlotKind::Uniform => {
                            if !uniforms.iter().any(|u| u.name == slot.name) {
                                uniforms.push(slot.clone());
                            }
                        }
                        SlotKind::Attribute => attributes.push(slot.clone()),
                    }
                }
                (true, uniforms, attributes)
            }
            (Some(_), Some(_)) => (false, Vec::new(), Vec::new()),
            _ => {
                info_log = "Program needs one vertex and one fragment shader.".to_string();
                (false, Vec::new(), Vec::new())
            }
        };

        let p = &mut state.programs[index];
        p.linked = linked;
        p.info_log = info_log;
        p.uniforms = uniforms;
        p.attributes = attributes;
    }

    fn program_link_status(&self, program: RawProgram) -> bool {
        self.with_program(program, |p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: RawProgram) -> String {
        self.with_program(program, |p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn active_uniform(&self, program: RawProgram, index: u32) -> Option<ActiveSlot> {
        self.with_program(program, |p| p.uniforms.get(index as usize).cloned())
            .flatten()
    }

    fn active_attribute(&self, program: RawProgram, index: u32) -> Option<ActiveSlot> {
        self.with_program(program, |p| p.attributes.get(index as usize).cloned())
            .flatten()
    }

    fn uniform_location(&self, program: RawProgram, name: &str) -> Option<u32> {
        self.with_program(program, |p| find_slot(&p.uniforms, name))
            .flatten()
    }

    fn attribute_location(&self, program: RawProgram, name: &str) -> Option<u32> {
        self.with_program(program, |p| find_slot(&p.attributes, name))
            .flatten()
    }
}

fn find_slot(slots: &[ActiveSlot], name: &str) -> Option<u32> {
    slots
        .iter()
        .position(|slot| slot.name == name || base_name(&slot.name) == name)
        .map(|position| position as u32)
}

fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name)
}

fn has_entry_point(source: &str) -> bool {
    source
        .match_indices("main")
        .any(|(at, _)| source[at + 4..].trim_start().starts_with('('))
}

/// Scan a GLSL stage for uniform and attribute declarations.
///
/// Preprocessor lines are skipped. Statements end at `;`, `{` and `}`, so a
/// declaration following a function body is still seen. Returns the info log text on
/// an unknown type keyword.
fn scan_declarations(
    stage: ShaderStage,
    source: &str,
) -> Result<Vec<(SlotKind, ActiveSlot)>, String> {
    let mut declarations = Vec::new();
    let code: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in code.split(|c: char| matches!(c, ';' | '{' | '}')) {
        let mut tokens = strip_layout(statement.trim())
            .split_whitespace()
            .peekable();
        while matches!(
            tokens.peek(),
            Some(&("invariant" | "flat" | "smooth" | "centroid"))
        ) {
            tokens.next();
        }
        let kind = match tokens.next() {
            Some("uniform") => SlotKind::Uniform,
            Some("attribute") if stage == ShaderStage::Vertex => SlotKind::Attribute,
            Some("in") if stage == ShaderStage::Vertex => SlotKind::Attribute,
            _ => continue,
        };
        while matches!(tokens.peek(), Some(&("lowp" | "mediump" | "highp"))) {
            tokens.next();
        }
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let ty = GlType::from_glsl(keyword)
            .ok_or_else(|| format!("ERROR: 0:0: '{keyword}' : unknown type"))?;

        let rest = tokens.collect::<Vec<_>>().join(" ");
        for declarator in split_declarators(&rest) {
            // Drop any initializer, then close up `name [4]` into `name[4]`.
            let declarator: String = declarator
                .split('=')
                .next()
                .unwrap_or("")
                .split_whitespace()
                .collect();
            if declarator.is_empty() {
                continue;
            }
            let (name, size) = match declarator.split_once('[') {
                Some((name, rest)) => {
                    let size = rest.trim_end_matches(']').parse::<u32>().unwrap_or(1);
                    (format!("{name}[0]"), size.max(1))
                }
                None => (declarator, 1),
            };
            declarations.push((kind, ActiveSlot::new(name, size, ty)));
        }
    }

    Ok(declarations)
}

/// Remove a leading `layout(...)` qualifier.
fn strip_layout(statement: &str) -> &str {
    let Some(rest) = statement.strip_prefix("layout") else {
        return statement;
    };
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return statement;
    }
    match rest.find(')') {
        Some(end) => rest[end + 1..].trim_start(),
        None => statement,
    }
}

/// Split a declarator list on commas outside brackets and parentheses.
fn split_declarators(list: &str) -> Vec<&str> {
    let mut declarators = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (at, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                declarators.push(&list[start..at]);
                start = at + 1;
            }
            _ => {}
        }
    }
    declarators.push(&list[start..]);
    declarators
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "
        attribute vec3 vertices;
        uniform mat4 transform;
        uniform vec3 lights[4]; // point lights
        void main() { gl_Position = transform * vec4(vertices, 1.0); }
    ";
    const FS: &str = "
        precision mediump float;
        uniform sampler2D diffuseMap;
        uniform mat4 transform;
        void main() { gl_FragColor = texture2D(diffuseMap, vec2(0.0)); }
    ";

    fn compile(backend: &DummyBackend, stage: ShaderStage, source: &str) -> RawShader {
        let shader = backend.create_shader(stage).unwrap();
        backend.shader_source(shader, source);
        backend.compile_shader(shader);
        shader
    }

    fn link(backend: &DummyBackend, vs: RawShader, fs: RawShader) -> RawProgram {
        let program = backend.create_program().unwrap();
        backend.attach_shader(program, vs);
        backend.attach_shader(program, fs);
        backend.link_program(program);
        program
    }

    #[test]
    fn test_dummy_backend_reflects_declarations() {
        let backend = DummyBackend::new();
        let vs = compile(&backend, ShaderStage::Vertex, VS);
        let fs = compile(&backend, ShaderStage::Fragment, FS);
        let program = link(&backend, vs, fs);

        assert!(backend.program_link_status(program));
        assert_eq!(
            backend.active_uniform(program, 0),
            Some(ActiveSlot::new("transform", 1, GlType::FLOAT_MAT4))
        );
        assert_eq!(
            backend.active_uniform(program, 1),
            Some(ActiveSlot::new("lights[0]", 4, GlType::FLOAT_VEC3))
        );
        assert_eq!(
            backend.active_uniform(program, 2),
            Some(ActiveSlot::new("diffuseMap", 1, GlType::SAMPLER_2D))
        );
        assert_eq!(backend.active_uniform(program, 3), None);
        assert_eq!(
            backend.active_attribute(program, 0),
            Some(ActiveSlot::new("vertices", 1, GlType::FLOAT_VEC3))
        );
        assert_eq!(backend.active_attribute(program, 1), None);
        assert_eq!(backend.uniform_location(program, "lights"), Some(1));
        assert_eq!(backend.attribute_location(program, "vertices"), Some(0));
        assert_eq!(backend.uniform_location(program, "missing"), None);
    }

    #[test]
    fn test_dummy_backend_compile_failure() {
        let backend = DummyBackend::new();
        let vs = compile(&backend, ShaderStage::Vertex, "uniform mat4 transform;");
        assert!(!backend.shader_compile_status(vs));
        assert!(backend.shader_info_log(vs).contains("main"));

        let fs = compile(&backend, ShaderStage::Fragment, "uniform dmat4 m; void main() {}");
        assert!(!backend.shader_compile_status(fs));
        assert!(backend.shader_info_log(fs).contains("dmat4"));

        let program = link(&backend, vs, fs);
        assert!(!backend.program_link_status(program));
        assert!(!backend.program_info_log(program).is_empty());
        assert_eq!(backend.active_uniform(program, 0), None);
    }

    #[test]
    fn test_dummy_backend_context_lost() {
        let backend = DummyBackend::new();
        backend.set_context_lost(true);
        assert_eq!(
            backend.create_shader(ShaderStage::Vertex),
            Err(BackendError::ContextLost)
        );
        assert_eq!(backend.create_program(), Err(BackendError::ContextLost));

        backend.set_context_lost(false);
        assert!(backend.create_program().is_ok());
        assert_eq!(backend.stats().programs_created, 1);
    }

    fn uniform_names(backend: &DummyBackend, vs: &str, fs: &str) -> Vec<String> {
        let vs = compile(backend, ShaderStage::Vertex, vs);
        let fs = compile(backend, ShaderStage::Fragment, fs);
        let program = link(backend, vs, fs);
        assert!(backend.program_link_status(program));
        (0..)
            .map_while(|index| backend.active_uniform(program, index))
            .map(|slot| slot.name)
            .collect()
    }

    #[test]
    fn test_dummy_backend_skips_preprocessor_lines() {
        let backend = DummyBackend::new();
        let names = uniform_names(
            &backend,
            "#version 100\n#define SCALE 2.0\nuniform mat4 transform;\nvoid main() {}",
            "void main() {}",
        );
        assert_eq!(names, ["transform"]);
    }

    #[test]
    fn test_dummy_backend_sees_declarations_after_functions() {
        let backend = DummyBackend::new();
        let names = uniform_names(
            &backend,
            "void main() {}",
            "vec4 f() { return vec4(1.0); }\nuniform vec4 tint;\nvoid main() {}",
        );
        assert_eq!(names, ["tint"]);
    }

    #[test]
    fn test_dummy_backend_layout_qualifier() {
        let backend = DummyBackend::new();
        let vs = compile(
            &backend,
            ShaderStage::Vertex,
            "layout(location = 0) in vec3 vertices;\nlayout(location=1) in vec4 weights[2];\nvoid main() {}",
        );
        let fs = compile(&backend, ShaderStage::Fragment, "void main() {}");
        let program = link(&backend, vs, fs);

        assert_eq!(
            backend.active_attribute(program, 0),
            Some(ActiveSlot::new("vertices", 1, GlType::FLOAT_VEC3))
        );
        assert_eq!(
            backend.active_attribute(program, 1),
            Some(ActiveSlot::new("weights[0]", 2, GlType::FLOAT_VEC4))
        );
    }

    #[test]
    fn test_dummy_backend_initializers() {
        let backend = DummyBackend::new();
        let names = uniform_names(
            &backend,
            "uniform vec3 tint = vec3(1.0, 0.5, 0.0), fog;\nuniform float scale = 2.0;\nvoid main() {}",
            "void main() {}",
        );
        assert_eq!(names, ["tint", "fog", "scale"]);
    }

    #[test]
    fn test_dummy_backend_counts_calls() {
        let backend = DummyBackend::new();
        let vs = compile(&backend, ShaderStage::Vertex, VS);
        let fs = compile(&backend, ShaderStage::Fragment, FS);
        link(&backend, vs, fs);

        assert_eq!(
            backend.stats(),
            DummyStats {
                shaders_created: 2,
                shader_compiles: 2,
                programs_created: 1,
                program_links: 1,
            }
        );
    }
}

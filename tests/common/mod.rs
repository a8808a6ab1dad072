//! Common utilities for compiler integration tests.
//!
//! Shader sources here are written for the dummy backend, which reflects slots
//! straight out of the declarations.

#![allow(dead_code)]

use shader_program_cache::{CompilerConfig, DummyBackend, ShaderCompiler};

// ============================================================================
// Shader Sources
// ============================================================================

pub const TEXTURED_VS: &str = "\
uniform mat4 transform;
attribute vec3 vertices;
attribute vec2 uvs;
varying vec2 uv;
void main() {
    uv = uvs;
    gl_Position = transform * vec4(vertices, 1.0);
}";

pub const TEXTURED_FS: &str = "\
precision mediump float;
uniform sampler2D diffuseMap;
varying vec2 uv;
void main() {
    gl_FragColor = texture2D(diffuseMap, uv);
}";

pub const MULTI_TEXTURE_FS: &str = "\
precision mediump float;
uniform sampler2D diffuseMap;
uniform vec4 tint;
uniform sampler2D normalMap;
uniform samplerCube environment;
varying vec2 uv;
void main() {
    gl_FragColor = tint * texture2D(diffuseMap, uv) * texture2D(normalMap, uv);
}";

pub const ARRAY_FS: &str = "\
precision mediump float;
uniform vec4 colors[4];
void main() {
    gl_FragColor = colors[0];
}";

/// Fragment stage the dummy compiler rejects.
pub const BROKEN_FS: &str = "uniform vec4 tint;";

pub const TRIANGLE: [u16; 3] = [0, 1, 2];

// ============================================================================
// Setup
// ============================================================================

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn compiler() -> ShaderCompiler<DummyBackend> {
    init_logging();
    ShaderCompiler::new(DummyBackend::new())
}

pub fn compiler_with(config: CompilerConfig) -> ShaderCompiler<DummyBackend> {
    init_logging();
    ShaderCompiler::with_config(DummyBackend::new(), config)
}

/// Three vertices worth of data for a `vecN` attribute.
pub fn triangle_data(components: usize) -> Vec<f32> {
    (0..3 * components).map(|i| i as f32).collect()
}

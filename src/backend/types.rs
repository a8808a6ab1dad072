//! Common types shared between backends

/// Shader stage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a backend shader object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawShader(pub u32);

/// Handle to a backend program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawProgram(pub u32);

/// GL type tag of an active uniform or attribute.
///
/// Values are the GL enum constants, so backends built on GL can pass the driver's
/// value straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlType(pub u32);

impl GlType {
    pub const INT: Self = Self(0x1404);
    pub const FLOAT: Self = Self(0x1406);
    pub const FLOAT_VEC2: Self = Self(0x8B50);
    pub const FLOAT_VEC3: Self = Self(0x8B51);
    pub const FLOAT_VEC4: Self = Self(0x8B52);
    pub const INT_VEC2: Self = Self(0x8B53);
    pub const INT_VEC3: Self = Self(0x8B54);
    pub const INT_VEC4: Self = Self(0x8B55);
    pub const BOOL: Self = Self(0x8B56);
    pub const FLOAT_MAT2: Self = Self(0x8B5A);
    pub const FLOAT_MAT3: Self = Self(0x8B5B);
    pub const FLOAT_MAT4: Self = Self(0x8B5C);
    pub const SAMPLER_2D: Self = Self(0x8B5E);
    pub const SAMPLER_CUBE: Self = Self(0x8B60);

    /// Whether this type samples a texture and so needs a texture unit.
    pub fn is_sampler(&self) -> bool {
        matches!(*self, GlType::SAMPLER_2D | GlType::SAMPLER_CUBE)
    }

    /// Number of scalar components per element, `None` for samplers and unknown tags.
    pub fn components(&self) -> Option<u32> {
        match *self {
            GlType::INT | GlType::FLOAT | GlType::BOOL => Some(1),
            GlType::FLOAT_VEC2 | GlType::INT_VEC2 => Some(2),
            GlType::FLOAT_VEC3 | GlType::INT_VEC3 => Some(3),
            GlType::FLOAT_VEC4 | GlType::INT_VEC4 | GlType::FLOAT_MAT2 => Some(4),
            GlType::FLOAT_MAT3 => Some(9),
            GlType::FLOAT_MAT4 => Some(16),
            _ => None,
        }
    }

    /// Parse a GLSL type keyword (`vec3`, `sampler2D`, ...).
    pub fn from_glsl(keyword: &str) -> Option<Self> {
        let ty = match keyword {
            "int" => GlType::INT,
            "float" => GlType::FLOAT,
            "bool" => GlType::BOOL,
            "vec2" => GlType::FLOAT_VEC2,
            "vec3" => GlType::FLOAT_VEC3,
            "vec4" => GlType::FLOAT_VEC4,
            "ivec2" => GlType::INT_VEC2,
            "ivec3" => GlType::INT_VEC3,
            "ivec4" => GlType::INT_VEC4,
            "mat2" => GlType::FLOAT_MAT2,
            "mat3" => GlType::FLOAT_MAT3,
            "mat4" => GlType::FLOAT_MAT4,
            "sampler2D" => GlType::SAMPLER_2D,
            "samplerCube" => GlType::SAMPLER_CUBE,
            _ => return None,
        };
        Some(ty)
    }
}

/// An active uniform or attribute as reported by the backend at one enumeration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSlot {
    /// Raw name, possibly with an array suffix such as `lights[0]`.
    pub name: String,
    /// Array length, 1 for non-array slots.
    pub size: u32,
    pub ty: GlType,
}

impl ActiveSlot {
    pub fn new(name: impl Into<String>, size: u32, ty: GlType) -> Self {
        Self {
            name: name.into(),
            size,
            ty,
        }
    }
}

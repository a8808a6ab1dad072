//! Uniform values and bindings.

use std::sync::Arc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::backend::GlType;
use crate::introspect::SlotDescriptor;

/// Opaque reference to a texture owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Raw host data for a uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
    /// Flat float data for array uniforms.
    Floats(Vec<f32>),
    Texture(TextureId),
}

impl UniformValue {
    /// Byte view of the value for upload, `None` for textures.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        let bytes = match self {
            UniformValue::Int(v) => bytemuck::bytes_of(v),
            UniformValue::Float(v) => bytemuck::bytes_of(v),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v),
            UniformValue::Vec4(v) => bytemuck::bytes_of(v),
            UniformValue::Mat3(v) => bytemuck::bytes_of(v),
            UniformValue::Mat4(v) => bytemuck::bytes_of(v),
            UniformValue::Floats(v) => bytemuck::cast_slice(v.as_slice()),
            UniformValue::Texture(_) => return None,
        };
        Some(bytes)
    }

    pub fn texture(&self) -> Option<TextureId> {
        match self {
            UniformValue::Texture(id) => Some(*id),
            _ => None,
        }
    }
}

macro_rules! impl_from_uniform_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_uniform_value! {
    i32 => Int,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat3 => Mat3,
    Mat4 => Mat4,
    Vec<f32> => Floats,
    TextureId => Texture,
}

/// A uniform slot paired with the data to upload to it.
///
/// The value is shared: cloning a binding, or passing a pre-built binding through a
/// compile, keeps pointing at the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBinding {
    slot: SlotDescriptor,
    value: Arc<UniformValue>,
    texture_unit: Option<u32>,
}

impl UniformBinding {
    pub fn new(slot: SlotDescriptor, value: impl Into<UniformValue>) -> Self {
        Self::from_shared(slot, Arc::new(value.into()))
    }

    pub fn from_shared(slot: SlotDescriptor, value: Arc<UniformValue>) -> Self {
        Self {
            slot,
            value,
            texture_unit: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    pub fn slot(&self) -> &SlotDescriptor {
        &self.slot
    }

    pub fn ty(&self) -> GlType {
        self.slot.ty
    }

    pub fn location(&self) -> Option<u32> {
        self.slot.location
    }

    pub fn value(&self) -> &UniformValue {
        &self.value
    }

    pub fn shared_value(&self) -> &Arc<UniformValue> {
        &self.value
    }

    /// Whether both bindings point at the same value allocation.
    pub fn shares_value_with(&self, other: &UniformBinding) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// Texture unit assigned for sampler uniforms.
    pub fn texture_unit(&self) -> Option<u32> {
        self.texture_unit
    }

    pub(crate) fn assign_texture_unit(&mut self, unit: u32) {
        self.texture_unit = Some(unit);
    }
}

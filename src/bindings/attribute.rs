//! Vertex attribute bindings.

use std::sync::Arc;

use crate::backend::GlType;
use crate::introspect::SlotDescriptor;

/// An attribute slot paired with its per-vertex data.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBinding {
    slot: SlotDescriptor,
    data: Arc<[f32]>,
}

impl AttributeBinding {
    pub fn new(slot: SlotDescriptor, data: impl Into<Arc<[f32]>>) -> Self {
        Self {
            slot,
            data: data.into(),
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

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data[..])
    }

    /// Floats per vertex, from the slot type. Unknown types count as 1.
    pub fn components(&self) -> usize {
        self.slot.ty.components().unwrap_or(1) as usize
    }

    /// Number of whole vertices in the data.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.components()
    }

    /// Whether both bindings point at the same data allocation.
    pub fn shares_data_with(&self, other: &AttributeBinding) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

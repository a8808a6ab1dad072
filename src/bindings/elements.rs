//! Element (index) bindings.
//!
//! Indices are always stored as `u16`. Wider input is narrowed on the way in.

use std::sync::Arc;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{CompileError, CompileResult};

/// A 16-bit index list ready for an indexed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBinding {
    indices: Arc<[u16]>,
}

impl ElementBinding {
    pub fn new(indices: impl Into<Arc<[u16]>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices[..])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether both bindings point at the same index allocation.
    pub fn ptr_eq(&self, other: &ElementBinding) -> bool {
        Arc::ptr_eq(&self.indices, &other.indices)
    }
}

/// Element data as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementData {
    U16(Vec<u16>),
    /// Narrowed to 16 bits when bound.
    U32(Vec<u32>),
    /// Passed through as-is.
    Prebuilt(ElementBinding),
}

impl From<Vec<u16>> for ElementData {
    fn from(indices: Vec<u16>) -> Self {
        ElementData::U16(indices)
    }
}

impl From<&[u16]> for ElementData {
    fn from(indices: &[u16]) -> Self {
        ElementData::U16(indices.to_vec())
    }
}

impl<const N: usize> From<[u16; N]> for ElementData {
    fn from(indices: [u16; N]) -> Self {
        ElementData::U16(indices.to_vec())
    }
}

impl From<Vec<u32>> for ElementData {
    fn from(indices: Vec<u32>) -> Self {
        ElementData::U32(indices)
    }
}

impl From<ElementBinding> for ElementData {
    fn from(binding: ElementBinding) -> Self {
        ElementData::Prebuilt(binding)
    }
}

/// Build the element binding for a request. Absent data aborts the request.
pub(crate) fn create_elements(
    data: Option<ElementData>,
    sink: &mut DiagnosticSink,
) -> CompileResult<ElementBinding> {
    let Some(data) = data else {
        log::error!("missing 'elements' in supplied data, quitting");
        return Err(CompileError::MissingElements);
    };

    let binding = match data {
        ElementData::Prebuilt(binding) => binding,
        ElementData::U16(indices) => ElementBinding::new(indices),
        ElementData::U32(indices) => {
            let overflow = indices.iter().filter(|&&i| i > u32::from(u16::MAX)).count();
            if overflow > 0 {
                sink.push(Diagnostic::IndexTruncated { count: overflow });
            }
            let narrowed: Vec<u16> = indices.into_iter().map(|i| i as u16).collect();
            ElementBinding::new(narrowed)
        }
    };

    Ok(binding)
}

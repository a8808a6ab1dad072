//! Binding synthesis.
//!
//! Reconciles reflected slots against the caller's named data. Each slot either
//! - has no entry: a missing-declaration diagnostic is raised and the slot is skipped,
//! - has a pre-built binding: it is passed through, sharing the caller's data,
//! - has raw data: a new binding is built around the slot and the data.
//!
//! Sampler uniforms take texture units 0, 1, 2, ... in slot enumeration order. The
//! counter is per call and advances for every sampler actually bound, pre-built or not.

mod attribute;
mod elements;
mod uniform;

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::GpuBackend;
use crate::diagnostics::{BindingKind, Diagnostic, DiagnosticSink};
use crate::introspect::SlotDescriptor;

pub use attribute::AttributeBinding;
pub(crate) use elements::create_elements;
pub use elements::{ElementBinding, ElementData};
pub use uniform::{TextureId, UniformBinding, UniformValue};

/// A value supplied under a slot name.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedValue {
    /// Raw uniform data, wrapped into a new [`UniformBinding`].
    Uniform(UniformValue),
    /// Raw per-vertex data, wrapped into a new [`AttributeBinding`].
    Attribute(Arc<[f32]>),
    /// A binding built earlier, passed through.
    UniformBinding(UniformBinding),
    /// A binding built earlier, passed through.
    AttributeBinding(AttributeBinding),
}

impl From<UniformValue> for NamedValue {
    fn from(value: UniformValue) -> Self {
        NamedValue::Uniform(value)
    }
}

impl From<UniformBinding> for NamedValue {
    fn from(binding: UniformBinding) -> Self {
        NamedValue::UniformBinding(binding)
    }
}

impl From<AttributeBinding> for NamedValue {
    fn from(binding: AttributeBinding) -> Self {
        NamedValue::AttributeBinding(binding)
    }
}

/// Build uniform bindings for `slots`, taking matching entries out of `data`.
pub(crate) fn create_uniforms<B: GpuBackend + ?Sized>(
    backend: &B,
    slots: &[SlotDescriptor],
    data: &mut HashMap<String, NamedValue>,
    sink: &mut DiagnosticSink,
) -> HashMap<String, UniformBinding> {
    let mut uniforms = HashMap::with_capacity(slots.len());
    let mut texture_unit = 0;

    for slot in slots {
        let mut binding = match data.remove(&slot.name) {
            None => {
                sink.push(Diagnostic::MissingBinding {
                    kind: BindingKind::Uniform,
                    name: slot.name.clone(),
                });
                continue;
            }
            Some(NamedValue::UniformBinding(binding)) => binding,
            Some(NamedValue::Uniform(value)) => UniformBinding::new(slot.clone(), value),
            Some(other) => {
                sink.push(Diagnostic::MismatchedBinding {
                    kind: BindingKind::Uniform,
                    name: slot.name.clone(),
                });
                data.insert(slot.name.clone(), other);
                continue;
            }
        };

        if backend.is_sampler(binding.ty()) {
            binding.assign_texture_unit(texture_unit);
            texture_unit += 1;
        }
        uniforms.insert(slot.name.clone(), binding);
    }

    uniforms
}

/// Build attribute bindings for `slots`, taking matching entries out of `data`.
pub(crate) fn create_attributes(
    slots: &[SlotDescriptor],
    data: &mut HashMap<String, NamedValue>,
    sink: &mut DiagnosticSink,
) -> HashMap<String, AttributeBinding> {
    let mut attributes = HashMap::with_capacity(slots.len());

    for slot in slots {
        let binding = match data.remove(&slot.name) {
            None => {
                sink.push(Diagnostic::MissingBinding {
                    kind: BindingKind::Attribute,
                    name: slot.name.clone(),
                });
                continue;
            }
            Some(NamedValue::AttributeBinding(binding)) => binding,
            Some(NamedValue::Attribute(values)) => AttributeBinding::new(slot.clone(), values),
            Some(other) => {
                sink.push(Diagnostic::MismatchedBinding {
                    kind: BindingKind::Attribute,
                    name: slot.name.clone(),
                });
                data.insert(slot.name.clone(), other);
                continue;
            }
        };

        if binding.data().len() % binding.components() != 0 {
            sink.push(Diagnostic::AttributeLengthMismatch {
                name: slot.name.clone(),
                len: binding.data().len(),
                components: binding.components(),
            });
        }
        attributes.insert(slot.name.clone(), binding);
    }

    attributes
}

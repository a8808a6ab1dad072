//! Active slot reflection.
//!
//! Slots are enumerated by asking the backend for index 0, 1, 2, ... until it reports
//! nothing. The first miss ends the scan. The configured cap ends it if a backend
//! never misses.
//!
//! Array slots are keyed by their base name (`lights[0]` becomes `lights`). Individual
//! array elements are not addressable through the resulting descriptors.

use crate::backend::{ActiveSlot, GlType, GpuBackend, RawProgram};
use crate::diagnostics::{BindingKind, Diagnostic, DiagnosticSink};
use crate::program::ProgramHandle;

/// One active uniform or attribute of a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Name with any `[...]` suffix removed.
    pub name: String,
    /// Declared array length, 1 for plain slots.
    pub size: u32,
    pub ty: GlType,
    /// Location resolved by name, `None` if the backend could not resolve it.
    pub location: Option<u32>,
    /// Enumeration index the slot was reported at.
    pub index: u32,
}

/// Strip a trailing array suffix: `colors[0]` -> `colors`.
pub fn strip_array_suffix(name: &str) -> &str {
    match name.find('[') {
        Some(at) => &name[..at],
        None => name,
    }
}

/// Enumerate the active uniforms of `program` in index order.
pub(crate) fn extract_uniforms<B: GpuBackend + ?Sized>(
    backend: &B,
    program: &ProgramHandle,
    max_slots: u32,
    sink: &mut DiagnosticSink,
) -> Vec<SlotDescriptor> {
    let (slots, _) = scan(
        program,
        BindingKind::Uniform,
        max_slots,
        sink,
        |raw, index| backend.active_uniform(raw, index),
        |raw, name| backend.uniform_location(raw, name),
    );
    slots
}

/// Enumerate the active attributes of `program` in index order.
///
/// Records the highest index reached on the program handle.
pub(crate) fn extract_attributes<B: GpuBackend + ?Sized>(
    backend: &B,
    program: &ProgramHandle,
    max_slots: u32,
    sink: &mut DiagnosticSink,
) -> Vec<SlotDescriptor> {
    let (slots, scanned) = scan(
        program,
        BindingKind::Attribute,
        max_slots,
        sink,
        |raw, index| backend.active_attribute(raw, index),
        |raw, name| backend.attribute_location(raw, name),
    );
    program.set_highest_attribute_index(scanned.checked_sub(1));
    slots
}

/// Returns the deduplicated descriptors and the number of indices that held a slot.
fn scan(
    program: &ProgramHandle,
    kind: BindingKind,
    max_slots: u32,
    sink: &mut DiagnosticSink,
    active: impl Fn(RawProgram, u32) -> Option<ActiveSlot>,
    locate: impl Fn(RawProgram, &str) -> Option<u32>,
) -> (Vec<SlotDescriptor>, u32) {
    let raw = program.raw();
    let mut slots: Vec<SlotDescriptor> = Vec::new();
    let mut index = 0;

    loop {
        if index >= max_slots {
            if active(raw, index).is_some() {
                sink.push(Diagnostic::SlotScanTruncated {
                    kind,
                    program_id: program.id(),
                    limit: max_slots,
                });
            }
            break;
        }
        let Some(slot) = active(raw, index) else {
            break;
        };

        let name = strip_array_suffix(&slot.name);
        if slots.iter().any(|existing| existing.name == name) {
            log::debug!(
                "program #{}: {} `{}` at index {} collapses onto an earlier slot",
                program.id(),
                kind,
                slot.name,
                index
            );
        } else {
            slots.push(SlotDescriptor {
                name: name.to_string(),
                size: slot.size.max(1),
                ty: slot.ty,
                location: locate(raw, name),
                index,
            });
        }

        index += 1;
    }

    log::trace!(
        "program #{}: {} active {}s",
        program.id(),
        slots.len(),
        kind
    );
    (slots, index)
}

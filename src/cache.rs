//! Source-pair identity cache.
//!
//! Maps an exact `(vertex source, fragment source)` pair to the program linked from
//! it. Equality is byte-for-byte on both fields and order-sensitive: swapping the
//! sources is a different key. Entries live until [`ProgramCache::clear`].
//!
//! The cache is not internally synchronized. Every mutation goes through `&mut self`,
//! so the at-most-once guarantee holds as long as lookup and insert happen under the
//! same exclusive borrow (or the same lock, see
//! [`ShaderCompiler::into_shared`](crate::ShaderCompiler::into_shared)).

use std::collections::HashMap;

use crate::program::ProgramHandle;

/// Cache of linked programs keyed by their source pair.
///
/// Keyed by vertex source first, then fragment source, so both halves can be
/// looked up as borrowed `&str`.
#[derive(Debug, Default)]
pub struct ProgramCache {
    entries: HashMap<String, HashMap<String, ProgramHandle>>,
    len: usize,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the program linked from exactly these sources.
    pub fn lookup(&self, vertex: &str, fragment: &str) -> Option<ProgramHandle> {
        self.entries.get(vertex)?.get(fragment).cloned()
    }

    /// Remember the program linked from these sources.
    ///
    /// Returns the previously cached program for the pair, if any.
    pub fn insert(
        &mut self,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
        program: ProgramHandle,
    ) -> Option<ProgramHandle> {
        let previous = self
            .entries
            .entry(vertex.into())
            .or_default()
            .insert(fragment.into(), program);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn contains(&self, vertex: &str, fragment: &str) -> bool {
        self.entries
            .get(vertex)
            .is_some_and(|fragments| fragments.contains_key(fragment))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forget every cached program. GPU objects are not released.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }

    /// Iterate over all cached programs.
    pub fn programs(&self) -> impl Iterator<Item = &ProgramHandle> + '_ {
        self.entries.values().flat_map(|fragments| fragments.values())
    }
}

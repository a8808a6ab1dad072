//! Compiler configuration.

/// Configuration for a [`ShaderCompiler`](crate::ShaderCompiler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Upper bound on the number of active slots scanned per program and kind.
    ///
    /// The scan normally stops at the first index the driver reports as empty;
    /// this cap stops it even when a driver never does.
    pub max_active_slots: u32,
    /// Log level used for "missing declaration" diagnostics.
    pub missing_binding_level: log::Level,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_active_slots: 1024,
            missing_binding_level: log::Level::Warn,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_active_slots(mut self, max_active_slots: u32) -> Self {
        self.max_active_slots = max_active_slots;
        self
    }

    pub fn with_missing_binding_level(mut self, level: log::Level) -> Self {
        self.missing_binding_level = level;
        self
    }
}

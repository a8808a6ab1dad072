//! Non-fatal compile diagnostics.
//!
//! A diagnostic is logged the moment it is raised and also collected into the
//! [`CompiledUnit`](crate::CompiledUnit), so callers that need strict correctness can
//! inspect it instead of scraping logs.

use thiserror::Error;

use crate::backend::ShaderStage;

/// Which kind of slot a missing-binding diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Uniform,
    Attribute,
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKind::Uniform => f.write_str("uniform"),
            BindingKind::Attribute => f.write_str("attribute"),
        }
    }
}

/// A problem found while compiling, linking or binding that does not abort the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A shader stage failed to compile. The stage handle is kept regardless.
    #[error("{stage} shader #{shader_id} failed to compile: {log}")]
    StageCompile {
        stage: ShaderStage,
        shader_id: u64,
        log: String,
    },
    /// The program failed to link. The program handle is kept regardless.
    #[error("could not initialise program #{program_id}: {log}")]
    ProgramLink { program_id: u64, log: String },
    /// An active slot had no matching entry in the supplied data.
    #[error("missing declaration for {kind} `{name}`")]
    MissingBinding { kind: BindingKind, name: String },
    /// An entry exists under the slot's name but holds the wrong kind of value.
    #[error("value supplied for {kind} `{name}` is not {kind} data")]
    MismatchedBinding { kind: BindingKind, name: String },
    /// Slot enumeration hit the configured cap before the driver reported the end.
    #[error("stopped scanning active {kind}s of program #{program_id} after {limit} slots")]
    SlotScanTruncated {
        kind: BindingKind,
        program_id: u64,
        limit: u32,
    },
    /// Attribute data does not divide into whole vertices for the slot's type.
    #[error("attribute `{name}` has {len} floats, not a multiple of {components} components")]
    AttributeLengthMismatch {
        name: String,
        len: usize,
        components: usize,
    },
    /// Some 32-bit indices did not fit into 16 bits and were truncated.
    #[error("{count} element indices exceed 65535 and were truncated to 16 bits")]
    IndexTruncated { count: usize },
}

impl Diagnostic {
    /// Log this diagnostic at the level matching its kind.
    pub(crate) fn report(&self, missing_binding_level: log::Level) {
        match self {
            Diagnostic::StageCompile { .. } | Diagnostic::ProgramLink { .. } => {
                log::error!("{self}")
            }
            Diagnostic::MissingBinding { .. } | Diagnostic::MismatchedBinding { .. } => {
                log::log!(missing_binding_level, "{self}")
            }
            Diagnostic::SlotScanTruncated { .. }
            | Diagnostic::AttributeLengthMismatch { .. }
            | Diagnostic::IndexTruncated { .. } => log::warn!("{self}"),
        }
    }

    /// Name of the slot this diagnostic is about, for binding diagnostics.
    pub fn binding_name(&self, kind: BindingKind) -> Option<&str> {
        match self {
            Diagnostic::MissingBinding { kind: k, name }
            | Diagnostic::MismatchedBinding { kind: k, name }
                if *k == kind =>
            {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

/// Collects diagnostics for one compile call and logs each as it arrives.
#[derive(Debug)]
pub(crate) struct DiagnosticSink {
    missing_binding_level: log::Level,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub(crate) fn new(missing_binding_level: log::Level) -> Self {
        Self {
            missing_binding_level,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.report(self.missing_binding_level);
        self.diagnostics.push(diagnostic);
    }

    /// Record diagnostics that were already logged elsewhere.
    pub(crate) fn extend_silent(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let missing = Diagnostic::MissingBinding {
            kind: BindingKind::Uniform,
            name: "transform".into(),
        };
        assert_eq!(missing.to_string(), "missing declaration for uniform `transform`");

        let missing = Diagnostic::MissingBinding {
            kind: BindingKind::Attribute,
            name: "normals".into(),
        };
        assert_eq!(missing.to_string(), "missing declaration for attribute `normals`");

        let compile = Diagnostic::StageCompile {
            stage: ShaderStage::Fragment,
            shader_id: 3,
            log: "syntax error".into(),
        };
        assert_eq!(
            compile.to_string(),
            "fragment shader #3 failed to compile: syntax error"
        );
    }

    #[test]
    fn test_binding_name() {
        let missing = Diagnostic::MissingBinding {
            kind: BindingKind::Uniform,
            name: "transform".into(),
        };
        assert_eq!(missing.binding_name(BindingKind::Uniform), Some("transform"));
        assert_eq!(missing.binding_name(BindingKind::Attribute), None);
    }

    #[test]
    fn test_sink_collects_in_order() {
        let mut sink = DiagnosticSink::new(log::Level::Warn);
        sink.push(Diagnostic::IndexTruncated { count: 2 });
        sink.extend_silent([Diagnostic::ProgramLink {
            program_id: 1,
            log: String::new(),
        }]);

        let diagnostics = sink.into_vec();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0], Diagnostic::IndexTruncated { count: 2 });
    }
}

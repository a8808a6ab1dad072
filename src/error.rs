//! Error types for program compilation.
//!
//! Only two conditions abort a compile request: the backend failing to hand out a
//! shader/program object, and a request without element data. Everything else
//! (stage compile failures, link failures, unbound slots) is reported as a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) and the request carries on.

use thiserror::Error;

/// Errors raised by a [`GpuBackend`](crate::backend::GpuBackend) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not allocate a shader object.
    #[error("failed to create shader object: {0}")]
    ShaderCreationFailed(String),
    /// The backend could not allocate a program object.
    #[error("failed to create program object: {0}")]
    ProgramCreationFailed(String),
    /// The backend context is gone.
    #[error("GPU context lost")]
    ContextLost,
}

/// Errors that abort a [`compile`](crate::ShaderCompiler::compile) request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The request carried no element (index) data, so nothing can be drawn.
    #[error("missing 'elements' in supplied data")]
    MissingElements,
    /// The backend failed to allocate an object.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CompileError::MissingElements.to_string(),
            "missing 'elements' in supplied data"
        );

        let err: CompileError = BackendError::ShaderCreationFailed("no context".into()).into();
        assert_eq!(err.to_string(), "failed to create shader object: no context");
    }
}

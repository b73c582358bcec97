//! # Rendering Error Types

use starburst_math::MatrixError;
use thiserror::Error;

/// Failures reported by a [`crate::Renderer`] backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    /// A shader stage failed to compile.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// Stage name, `"vertex"` or `"fragment"`.
        stage: &'static str,
        /// Compiler output.
        log: String,
    },

    /// Compiled stages failed to link.
    #[error("program failed to link: {0}")]
    ProgramLink(String),

    /// The context went away while resources were being built.
    #[error("rendering context lost")]
    ContextLost,
}

/// Anything that can stop a frame.
#[derive(Error, Debug)]
pub enum ShowError {
    /// Matrix algebra failed (a bug, not a runtime condition).
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// The backend failed to (re)build its resources.
    #[error("renderer error: {0}")]
    Renderer(#[from] RendererError),
}

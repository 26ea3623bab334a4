//! Engine diagnostics
//!
//! The engine never fails a call site at runtime: misconfigurations it can only
//! detect late are reported through `tracing` with one of these values as the
//! payload, and construction falls back to the default path.

use thiserror::Error;

/// Late-detected configuration problems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A return mode produces a type the call site cannot use
    #[error("return mode `{mode}` produces `{produced}` but the call site returns `{expected}`")]
    ReturnTypeMismatch {
        /// Name of the configured mode
        mode: &'static str,
        /// Type the mode produces
        produced: &'static str,
        /// Type the call site needs
        expected: &'static str,
    },

    /// A builder layer handled `make_error` with a value of the wrong type
    #[error("builder layer produced a value that is not a `{expected}`")]
    LayerTypeMismatch {
        /// Type that was requested
        expected: &'static str,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for lanework operations

use thiserror::Error;

use crate::Backend;

/// Result type for lanework operations
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors that can occur during kernel dispatch or benchmark setup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    /// Backend not compiled for this target
    #[error("Backend not supported on this platform: {0:?}")]
    UnsupportedBackend(Backend),

    /// Size mismatch between operands (or between input and output)
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Reduction over an empty slice
    #[error("Empty input")]
    EmptyInput,

    /// Rejected run configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

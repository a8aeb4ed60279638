//! Error types for registration operations.
//!
//! This module provides structured error types for pair and stack
//! registration workflows.

use stackreg_core::CoreError;
use thiserror::Error;

/// Main error type for registration operations.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Invalid configuration (reference mode, frame counts, axis, window).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `transform` was called without an explicit matrix before any matrix was available.
    #[error("Register first: no transformation matrix available")]
    NotRegistered,

    /// Matrix stack and image stack disagree on the number of frames.
    #[error("Length mismatch: {matrices} transformation matrices for {frames} frames")]
    LengthMismatch { matrices: usize, frames: usize },

    /// Shape mismatch.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Failure reported by the registration engine.
    #[error("Engine error: {0}")]
    EngineError(String),

    /// Error raised by the core containers and matrix conventions.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an engine error.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::EngineError(msg.into())
    }

    /// Whether the error comes from a family without a canonical matrix.
    pub fn is_unsupported_representation(&self) -> bool {
        matches!(self, Self::Core(CoreError::UnsupportedRepresentation(_)))
    }
}

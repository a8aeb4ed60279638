//! Error types for image stacks and transform conventions.
//!
//! This module provides the structured error type shared by the
//! stack container, the matrix convention converter and the filters.

use thiserror::Error;

use crate::transform::TransformFamily;

/// Main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Input data has the wrong number of dimensions.
    #[error("Invalid dimensions: expected {expected} dimensions, got {actual}")]
    InvalidDimensions { expected: usize, actual: usize },

    /// Axis index outside the array rank.
    #[error("Axis {axis} out of range for a {rank}-dimensional array")]
    AxisOutOfRange { axis: usize, rank: usize },

    /// A frame index or frame range that selects nothing usable.
    #[error("Invalid frame range: {0}")]
    InvalidRange(String),

    /// The family has no 3x3 homogeneous equivalent.
    #[error("Unsupported representation: {0} transformation matrix not supported")]
    UnsupportedRepresentation(TransformFamily),

    /// A compact matrix that does not belong to the family it was paired with.
    #[error("Unexpected transformation: {0}")]
    UnexpectedTransformation(String),

    /// Unknown transformation family code or name.
    #[error("Invalid transformation: {0}")]
    InvalidFamily(String),

    /// Filter parameters that cannot be applied.
    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),

    /// Tensor data could not be read back.
    #[error("Tensor data error: {0}")]
    Data(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid range error.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Create an unexpected transformation error.
    pub fn unexpected_transformation(msg: impl Into<String>) -> Self {
        Self::UnexpectedTransformation(msg.into())
    }

    /// Create an invalid family error.
    pub fn invalid_family(msg: impl Into<String>) -> Self {
        Self::InvalidFamily(msg.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a tensor data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnsupportedRepresentation(TransformFamily::Bilinear);
        assert_eq!(
            err.to_string(),
            "Unsupported representation: bilinear transformation matrix not supported"
        );
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = CoreError::InvalidDimensions { expected: 3, actual: 2 };
        let msg = err.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
    }
}

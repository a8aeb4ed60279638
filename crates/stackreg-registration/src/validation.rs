//! Validation utilities for registration operations.
//!
//! All checks run before the engine is invoked so that configuration
//! mistakes never surface halfway through a stack.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use stackreg_core::ImageStack;

use crate::config::{ReferenceMode, StackRegConfig};
use crate::error::{RegistrationError, Result};

/// Smallest frame side that survives cropping the last row and column.
pub const MIN_FRAME_SIDE: usize = 2;

/// Validate that reference and moving frames can be registered together.
pub fn validate_frame_pair<B: Backend>(reference: &Tensor<B, 2>, moving: &Tensor<B, 2>) -> Result<()> {
    let reference_dims = reference.dims();
    let moving_dims = moving.dims();

    if reference_dims != moving_dims {
        return Err(RegistrationError::ShapeMismatch {
            expected: reference_dims.to_vec(),
            actual: moving_dims.to_vec(),
        });
    }

    validate_frame_dims(reference_dims)
}

/// Validate frame dimensions.
pub fn validate_frame_dims(dims: [usize; 2]) -> Result<()> {
    if dims.iter().any(|&d| d < MIN_FRAME_SIDE) {
        return Err(RegistrationError::invalid_configuration(format!(
            "frames must be at least {MIN_FRAME_SIDE}x{MIN_FRAME_SIDE}, got {}x{}",
            dims[0], dims[1]
        )));
    }
    Ok(())
}

/// Validate that a frame can be resampled: at least one pixel per side.
pub fn validate_warp_dims(dims: [usize; 2]) -> Result<()> {
    if dims.contains(&0) {
        return Err(RegistrationError::invalid_configuration(format!(
            "cannot warp an empty {}x{} frame",
            dims[0], dims[1]
        )));
    }
    Ok(())
}

/// Validate a moving-average window.
pub fn validate_moving_average(window: usize) -> Result<()> {
    if window == 0 {
        return Err(RegistrationError::invalid_configuration(
            "moving average window must be at least 1",
        ));
    }
    Ok(())
}

/// Validate a stack registration config against the stack it will run on.
pub fn validate_stack_config<B: Backend>(config: &StackRegConfig, stack: &ImageStack<B>) -> Result<()> {
    if config.axis >= 3 {
        return Err(RegistrationError::invalid_configuration(format!(
            "axis {} out of range for a 3-dimensional stack",
            config.axis
        )));
    }

    let frames = stack.frame_count(config.axis)?;
    if frames == 0 {
        return Err(RegistrationError::invalid_configuration("stack has no frames"));
    }

    validate_frame_dims(stack.frame_dims(config.axis)?)?;
    validate_moving_average(config.moving_average)?;

    if config.reference == ReferenceMode::First && !(1..=frames).contains(&config.n_frames) {
        return Err(RegistrationError::invalid_configuration(format!(
            "n_frames must be between 1 and {frames}, got {}",
            config.n_frames
        )));
    }

    Ok(())
}

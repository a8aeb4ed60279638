//! Core types for image stack registration.
//!
//! Frames are `burn` tensors, canonical transforms are `nalgebra` 3x3
//! homogeneous matrices, and compact matrices follow the layout consumed by
//! the registration engine.

pub mod error;
pub mod image;
pub mod transform;
pub mod interpolation;
pub mod filter;

pub use error::{CoreError, Result};
pub use image::ImageStack;
pub use transform::{CompactMatrix, TransformFamily};
pub use filter::{running_mean, RunningMeanFilter};

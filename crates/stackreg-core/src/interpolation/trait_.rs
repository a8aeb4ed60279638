//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators are used to sample frame values at non-integer coordinates,
/// which is what warping a frame through a transform requires.
/// Coordinates outside the frame are clamped to the border.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a frame at given continuous coordinates.
    ///
    /// # Arguments
    /// * `frame` - The source frame `[H, W]`
    /// * `coords` - The coordinates at which to interpolate `[Batch, 2]`, as `(x, y)`
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`
    fn interpolate(&self, frame: &Tensor<B, 2>, coords: Tensor<B, 2>) -> Tensor<B, 1>;
}

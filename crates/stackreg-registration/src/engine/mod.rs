//! Registration engine seam.
//!
//! The engine owns point correspondence and pixel resampling. Everything in
//! this crate talks to it in compact matrices; canonical matrices never
//! cross this boundary.

pub mod moments;

pub use moments::MomentEngine;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use nalgebra::Point2;
use stackreg_core::{CompactMatrix, TransformFamily};

use crate::error::Result;

/// Output of a point-matching call.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMatch {
    /// Transform from reference coordinates to moving coordinates.
    pub matrix: CompactMatrix,
    /// Landmarks in the reference frame.
    pub reference_points: Vec<Point2<f64>>,
    /// Corresponding landmarks in the moving frame.
    pub moving_points: Vec<Point2<f64>>,
}

/// Point-matching and warping capabilities consumed by the registrar.
///
/// Implementations may reject families they cannot estimate; such errors
/// are propagated to the caller unchanged.
pub trait RegistrationEngine<B: Backend> {
    /// Estimate the `family` transform mapping `reference` onto `moving`.
    ///
    /// Both frames have identical, even dimensions.
    fn point_match(
        &self,
        reference: &Tensor<B, 2>,
        moving: &Tensor<B, 2>,
        family: TransformFamily,
    ) -> Result<PointMatch>;

    /// Resample `image` so that `out(p) = image(matrix · p)`.
    ///
    /// The output has the same shape as the input.
    fn warp(&self, image: &Tensor<B, 2>, matrix: &CompactMatrix) -> Result<Tensor<B, 2>>;
}

impl<B: Backend, E: RegistrationEngine<B> + ?Sized> RegistrationEngine<B> for &E {
    fn point_match(
        &self,
        reference: &Tensor<B, 2>,
        moving: &Tensor<B, 2>,
        family: TransformFamily,
    ) -> Result<PointMatch> {
        (**self).point_match(reference, moving, family)
    }

    fn warp(&self, image: &Tensor<B, 2>, matrix: &CompactMatrix) -> Result<Tensor<B, 2>> {
        (**self).warp(image, matrix)
    }
}

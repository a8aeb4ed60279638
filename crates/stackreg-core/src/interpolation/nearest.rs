//! Nearest neighbor interpolation.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use super::trait_::Interpolator;

/// Nearest neighbor interpolator with border clamping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate(&self, frame: &Tensor<B, 2>, coords: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1] = frame.dims();

        let x = coords.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = coords.narrow(1, 1, 1).squeeze::<1>(1);

        let xi = (x + 0.5).floor().clamp(0.0, (d1 - 1) as f64).int();
        let yi = (y + 0.5).floor().clamp(0.0, (d0 - 1) as f64).int();

        let idx = yi * (d1 as i32) + xi;
        frame.clone().reshape([d0 * d1]).gather(0, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::to_host;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_nearest_rounds_to_closest_pixel() {
        let device = Default::default();
        let frame = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [2.0, 3.0]], &device);
        let coords = Tensor::<TestBackend, 2>::from_floats(
            [[0.4, 0.4], [0.6, 0.4], [0.4, 0.6], [9.0, -9.0]],
            &device,
        );
        let values = to_host(&NearestNeighborInterpolator::new().interpolate(&frame, coords)).unwrap();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 1.0]);
    }
}

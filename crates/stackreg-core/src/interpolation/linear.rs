//! Bilinear interpolation.

use burn::tensor::{Tensor, Int};
use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use super::trait_::Interpolator;

/// Linear Interpolator.
///
/// Performs bilinear interpolation with border clamping. Integer
/// coordinates reproduce the sampled pixel exactly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn gather_2d<B: Backend>(
        flat_data: &Tensor<B, 1>,
        xi: &Tensor<B, 1, Int>,
        yi: &Tensor<B, 1, Int>,
        stride_y: i32,
    ) -> Tensor<B, 1> {
        let idx = yi.clone() * stride_y + xi.clone();
        flat_data.clone().gather(0, idx)
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, frame: &Tensor<B, 2>, coords: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1] = frame.dims(); // Y, X
        let batch_size = coords.dims()[0];
        let device = coords.device();

        let x = coords.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = coords.narrow(1, 1, 1).squeeze::<1>(1);

        let x0 = x.clone().floor();
        let y0 = y.clone().floor();

        let wx = x - x0.clone();
        let wy = y - y0.clone();

        let x1 = x0.clone() + 1.0;
        let y1 = y0.clone() + 1.0;

        let x0_i = x0.clamp(0.0, (d1 - 1) as f64).int();
        let y0_i = y0.clamp(0.0, (d0 - 1) as f64).int();
        let x1_i = x1.clamp(0.0, (d1 - 1) as f64).int();
        let y1_i = y1.clamp(0.0, (d0 - 1) as f64).int();

        let stride_y = d1 as i32;
        let flat_data = frame.clone().reshape([d0 * d1]);

        let v00 = Self::gather_2d(&flat_data, &x0_i, &y0_i, stride_y);
        let v01 = Self::gather_2d(&flat_data, &x0_i, &y1_i, stride_y);
        let v10 = Self::gather_2d(&flat_data, &x1_i, &y0_i, stride_y);
        let v11 = Self::gather_2d(&flat_data, &x1_i, &y1_i, stride_y);

        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one - wy.clone();

        let c0 = v00 * one_minus_wx.clone() + v10 * wx.clone();
        let c1 = v01 * one_minus_wx + v11 * wx;

        c0 * one_minus_wy + c1 * wy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::to_host;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_linear_interpolation_2d() {
        let device = Default::default();
        // [[0, 1], [2, 3]]
        let frame = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [2.0, 3.0]], &device);
        let coords = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 0.0], [1.0, 1.0], [0.5, 0.0], [0.5, 0.5]],
            &device,
        );
        let values = to_host(&LinearInterpolator::new().interpolate(&frame, coords)).unwrap();
        let expected = [0.0, 3.0, 0.5, 1.5];
        for (v, e) in values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-6, "got {v}, expected {e}");
        }
    }

    #[test]
    fn test_linear_interpolation_clamps_border() {
        let device = Default::default();
        let frame = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [2.0, 3.0]], &device);
        let coords = Tensor::<TestBackend, 2>::from_floats([[-3.0, -3.0], [5.0, 5.0]], &device);
        let values = to_host(&LinearInterpolator::new().interpolate(&frame, coords)).unwrap();
        assert_eq!(values, vec![0.0, 3.0]);
    }
}

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::image::stack::{check_axis, ImageStack};

/// Moving-average filter along the frame axis of a stack.
///
/// The stack is padded by replicating its first frame `ceil(window / 2)`
/// times and its last frame `floor(window / 2)` times, so the output has the
/// same number of frames as the input. The mean is taken as a sliding
/// difference of the cumulative sum over the padded stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningMeanFilter {
    window: usize,
    axis: usize,
}

impl RunningMeanFilter {
    /// Create a filter averaging `window` frames along `axis`.
    pub fn new(window: usize, axis: usize) -> Self {
        Self { window, axis }
    }

    /// Number of frames averaged per output frame.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Frame axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Apply the filter to a stack.
    pub fn apply<B: Backend>(&self, stack: &ImageStack<B>) -> Result<ImageStack<B>> {
        self.apply_tensor(stack.tensor().clone()).map(ImageStack::new)
    }

    /// Apply the filter to a 3D tensor directly.
    pub fn apply_tensor<B: Backend>(&self, input: Tensor<B, 3>) -> Result<Tensor<B, 3>> {
        let (window, axis) = (self.window, self.axis);
        if window == 0 {
            return Err(CoreError::invalid_parameter("moving average window must be at least 1"));
        }
        check_axis(axis)?;
        let len = input.dims()[axis];
        if len == 0 {
            return Err(CoreError::invalid_range("cannot average an empty stack"));
        }

        let lead = window.div_ceil(2);
        let trail = window / 2;
        tracing::debug!(window, axis, frames = len, lead, trail, "running mean");
        let first = input.clone().narrow(axis, 0, 1);
        let last = input.clone().narrow(axis, len - 1, 1);

        let mut parts = Vec::with_capacity(lead + 1 + trail);
        parts.extend(std::iter::repeat(first).take(lead));
        parts.push(input);
        parts.extend(std::iter::repeat(last).take(trail));
        let padded = Tensor::cat(parts, axis);

        let cumsum = cumulative_sum(padded, axis, len + window);
        let upper = cumsum.clone().narrow(axis, window, len);
        let lower = cumsum.narrow(axis, 0, len);

        Ok((upper - lower).div_scalar(window as f64))
    }
}

/// Moving average of `stack` over `window` frames along `axis`.
pub fn running_mean<B: Backend>(
    stack: &ImageStack<B>,
    window: usize,
    axis: usize,
) -> Result<ImageStack<B>> {
    RunningMeanFilter::new(window, axis).apply(stack)
}

fn cumulative_sum<B: Backend>(input: Tensor<B, 3>, axis: usize, len: usize) -> Tensor<B, 3> {
    let mut sums: Vec<Tensor<B, 3>> = Vec::with_capacity(len);
    for k in 0..len {
        let slice = input.clone().narrow(axis, k, 1);
        let next = match sums.last() {
            Some(acc) => acc.clone() + slice,
            None => slice,
        };
        sums.push(next);
    }
    Tensor::cat(sums, axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::to_host;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn frames_with_values(values: &[f32], axis: usize) -> ImageStack<TestBackend> {
        let device = Default::default();
        let frames = values
            .iter()
            .map(|v| Tensor::<TestBackend, 2>::full([2, 3], *v, &device))
            .collect();
        ImageStack::from_frames(frames, axis).unwrap()
    }

    fn frame_values(stack: &ImageStack<TestBackend>, axis: usize) -> Vec<f64> {
        (0..stack.frame_count(axis).unwrap())
            .map(|i| to_host(&stack.frame(axis, i).unwrap()).unwrap()[0])
            .collect()
    }

    #[test]
    fn test_window_one_is_identity() {
        let stack = frames_with_values(&[1.0, 5.0, 2.0], 0);
        let out = running_mean(&stack, 1, 0).unwrap();
        assert_eq!(frame_values(&out, 0), vec![1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_linear_ramp_window_three() {
        let stack = frames_with_values(&[0.0, 1.0, 2.0, 3.0, 4.0], 0);
        let out = running_mean(&stack, 3, 0).unwrap();
        let expected = [1.0 / 3.0, 1.0, 2.0, 3.0, 11.0 / 3.0];
        for (v, e) in frame_values(&out, 0).iter().zip(expected) {
            assert!((v - e).abs() < 1e-5, "got {v}, expected {e}");
        }
    }

    #[test]
    fn test_even_window_pairs_with_next_frame() {
        let stack = frames_with_values(&[0.0, 2.0, 4.0], 2);
        let out = running_mean(&stack, 2, 2).unwrap();
        assert_eq!(out.dims(), stack.dims());
        let expected = [1.0, 3.0, 4.0];
        for (v, e) in frame_values(&out, 2).iter().zip(expected) {
            assert!((v - e).abs() < 1e-5, "got {v}, expected {e}");
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let stack = frames_with_values(&[0.0, 1.0], 0);
        assert!(matches!(running_mean(&stack, 0, 0), Err(CoreError::InvalidParameter(_))));
        assert!(matches!(running_mean(&stack, 2, 3), Err(CoreError::AxisOutOfRange { .. })));

        let empty = ImageStack::<TestBackend>::try_from_data(
            TensorData::new(Vec::<f32>::new(), [0, 2, 2]),
            &Default::default(),
        )
        .unwrap();
        assert!(running_mean(&empty, 2, 0).is_err());
    }
}

//! Image stack container.
//!
//! A stack is a 3D tensor holding a sequence of 2D frames along one
//! designated axis. The axis is chosen per operation, so the same stack can
//! be read as `[T, H, W]`, `[H, T, W]` or `[H, W, T]`.

use std::ops::Range;

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::error::{CoreError, Result};

/// Sequence of 2D frames stored as a single 3D tensor.
///
/// # Examples
/// ```rust
/// use stackreg_core::image::ImageStack;
/// use burn::tensor::TensorData;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = TensorData::new(vec![0.0f32; 4 * 8 * 8], [4, 8, 8]);
/// let stack = ImageStack::<Backend>::try_from_data(data, &device).unwrap();
/// assert_eq!(stack.frame_count(0).unwrap(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ImageStack<B: Backend> {
    data: Tensor<B, 3>,
}

impl<B: Backend> ImageStack<B> {
    /// Wrap an existing 3D tensor.
    pub fn new(data: Tensor<B, 3>) -> Self {
        Self { data }
    }

    /// Build a stack from raw tensor data, rejecting anything that is not 3D.
    pub fn try_from_data(data: TensorData, device: &B::Device) -> Result<Self> {
        let rank = data.shape.len();
        if rank != 3 {
            return Err(CoreError::InvalidDimensions {
                expected: 3,
                actual: rank,
            });
        }
        Ok(Self::new(Tensor::from_data(data, device)))
    }

    /// Stack frames along `axis`.
    pub fn from_frames(frames: Vec<Tensor<B, 2>>, axis: usize) -> Result<Self> {
        check_axis(axis)?;
        let first = frames
            .first()
            .ok_or_else(|| CoreError::invalid_range("cannot build a stack from zero frames"))?;
        let dims = first.dims();
        if let Some(odd) = frames.iter().find(|f| f.dims() != dims) {
            return Err(CoreError::invalid_range(format!(
                "frame shape {:?} differs from {:?}",
                odd.dims(),
                dims
            )));
        }
        Ok(Self::new(Tensor::stack::<3>(frames, axis)))
    }

    /// Shape of the underlying tensor.
    pub fn dims(&self) -> [usize; 3] {
        self.data.dims()
    }

    /// Get the stack tensor.
    pub fn tensor(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Consume the stack and return the tensor.
    pub fn into_tensor(self) -> Tensor<B, 3> {
        self.data
    }

    /// Number of frames along `axis`.
    pub fn frame_count(&self, axis: usize) -> Result<usize> {
        check_axis(axis)?;
        Ok(self.dims()[axis])
    }

    /// Shape `[rows, cols]` of a single frame when slicing along `axis`.
    pub fn frame_dims(&self, axis: usize) -> Result<[usize; 2]> {
        check_axis(axis)?;
        let dims = self.dims();
        let mut spatial = dims.iter().enumerate().filter(|(i, _)| *i != axis).map(|(_, d)| *d);
        match (spatial.next(), spatial.next()) {
            (Some(rows), Some(cols)) => Ok([rows, cols]),
            _ => Err(CoreError::InvalidDimensions { expected: 3, actual: dims.len() }),
        }
    }

    /// Frame `index` along `axis`.
    pub fn frame(&self, axis: usize, index: usize) -> Result<Tensor<B, 2>> {
        let count = self.frame_count(axis)?;
        if index >= count {
            return Err(CoreError::invalid_range(format!(
                "frame {index} out of range for {count} frames"
            )));
        }
        Ok(self.data.clone().narrow(axis, index, 1).squeeze::<2>(axis))
    }

    /// Elementwise mean of the frames in `range` along `axis`.
    pub fn mean_frames(&self, axis: usize, range: Range<usize>) -> Result<Tensor<B, 2>> {
        let count = self.frame_count(axis)?;
        if range.is_empty() || range.end > count {
            return Err(CoreError::invalid_range(format!(
                "cannot average frames {range:?} of {count}"
            )));
        }
        Ok(self
            .data
            .clone()
            .narrow(axis, range.start, range.len())
            .mean_dim(axis)
            .squeeze::<2>(axis))
    }

    /// Elementwise mean of all frames along `axis`.
    pub fn mean(&self, axis: usize) -> Result<Tensor<B, 2>> {
        let count = self.frame_count(axis)?;
        self.mean_frames(axis, 0..count)
    }
}

pub(crate) fn check_axis(axis: usize) -> Result<()> {
    if axis >= 3 {
        return Err(CoreError::AxisOutOfRange { axis, rank: 3 });
    }
    Ok(())
}

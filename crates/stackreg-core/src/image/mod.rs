//! Image types and operations.
//!
//! Frames are plain `Tensor<B, 2>` values indexed `[row, col]`; stacks wrap a
//! `Tensor<B, 3>` and expose per-axis frame access.

pub mod stack;
pub mod grid;

pub use stack::ImageStack;
pub use grid::generate_grid_2d;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::{CoreError, Result};

/// Read tensor values back to the host in row-major order.
pub fn to_host<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> Result<Vec<f64>> {
    tensor
        .to_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| CoreError::data(format!("{e:?}")))
}

/// Drop the last row and the last column of a frame.
///
/// Frames must be at least 2x2.
pub fn crop_last_row_col<B: Backend>(frame: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
    let [rows, cols] = frame.dims();
    if rows < 2 || cols < 2 {
        return Err(CoreError::invalid_range(format!(
            "cannot crop a {rows}x{cols} frame"
        )));
    }
    Ok(frame.slice([0..rows - 1, 0..cols - 1]))
}

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;

/// Generate a grid of pixel coordinates for a 2D frame shape.
///
/// Returns a tensor of shape `[N, 2]` where N is the total number of pixels,
/// in row-major order. Each row is `(x, y)`, that is `(col, row)`.
///
/// # Arguments
/// * `shape` - The frame shape `[H, W]`
/// * `device` - The device to create the tensor on
pub fn generate_grid_2d<B>(
    shape: [usize; 2],
    device: &B::Device,
) -> Tensor<B, 2>
where
    B: Backend,
{
    let h = shape[0];
    let w = shape[1];
    let total = h * w;

    let mut grid = Vec::with_capacity(total * 2);
    for y in 0..h {
        for x in 0..w {
            grid.push(x as f32);
            grid.push(y as f32);
        }
    }

    Tensor::<B, 1>::from_data(TensorData::new(grid, Shape::new([total * 2])), device)
        .reshape([total, 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::to_host;
    use burn_ndarray::NdArray;

    #[test]
    fn test_grid_layout() {
        let grid = generate_grid_2d::<NdArray<f32>>([2, 3], &Default::default());
        assert_eq!(grid.dims(), [6, 2]);
        let values = to_host(&grid).unwrap();
        // pixel (row 1, col 2) is the last entry
        assert_eq!(&values[10..], &[2.0, 1.0]);
        assert_eq!(&values[2..4], &[1.0, 0.0]);
    }
}

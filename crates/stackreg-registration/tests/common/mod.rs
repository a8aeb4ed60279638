#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use nalgebra::Point2;
use stackreg_core::image::to_host;
use stackreg_core::{CompactMatrix, ImageStack, TransformFamily};
use stackreg_registration::{PointMatch, RegistrationEngine, RegistrationError, Result};

pub type TestBackend = NdArray<f32>;

/// `size`x`size` frame with a bright `side`x`side` square whose top-left
/// corner sits at column `x`, row `y`.
pub fn square(size: usize, x: usize, y: usize, side: usize) -> Tensor<TestBackend, 2> {
    let mut values = vec![0.0f32; size * size];
    for row in y..y + side {
        for col in x..x + side {
            values[row * size + col] = 1.0;
        }
    }
    Tensor::from_data(TensorData::new(values, [size, size]), &Default::default())
}

/// Squares of side 12 on 64x64 frames at the given corners, stacked along `axis`.
pub fn square_stack(corners: &[(usize, usize)], axis: usize) -> ImageStack<TestBackend> {
    let frames = corners.iter().map(|&(x, y)| square(64, x, y, 12)).collect();
    ImageStack::from_frames(frames, axis).unwrap()
}

/// 8x8 frames of constant value, one per entry of `values`, stacked along `axis`.
pub fn constant_stack(values: &[f32], axis: usize) -> ImageStack<TestBackend> {
    let frames = values
        .iter()
        .map(|&v| Tensor::full([8, 8], v, &Default::default()))
        .collect();
    ImageStack::from_frames(frames, axis).unwrap()
}

pub fn zeros_stack(shape: [usize; 3]) -> ImageStack<TestBackend> {
    ImageStack::new(Tensor::zeros(shape, &Default::default()))
}

/// Engine that replays a fixed sequence of point-matching results and warps
/// by returning its input unchanged.
#[derive(Default)]
pub struct ScriptedEngine {
    script: RefCell<VecDeque<std::result::Result<CompactMatrix, String>>>,
    fallback: Option<CompactMatrix>,
    seen: RefCell<Vec<[usize; 2]>>,
    pixels: RefCell<Vec<(f64, f64)>>,
}

impl ScriptedEngine {
    pub fn new(matrices: impl IntoIterator<Item = CompactMatrix>) -> Self {
        Self {
            script: RefCell::new(matrices.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    /// Answer every call with the identity of `family`.
    pub fn identity(family: TransformFamily) -> Self {
        Self {
            fallback: Some(CompactMatrix::identity(family)),
            ..Self::default()
        }
    }

    /// Fail on the next call once every queued matrix has been used.
    pub fn then_fail(self, message: &str) -> Self {
        self.script.borrow_mut().push_back(Err(message.to_string()));
        self
    }

    /// Number of point-matching calls made so far.
    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }

    /// First pixel of the reference frame of every point-matching call.
    pub fn reference_pixels(&self) -> Vec<f64> {
        self.pixels.borrow().iter().map(|p| p.0).collect()
    }

    /// First pixel of the moving frame of every point-matching call.
    pub fn moving_pixels(&self) -> Vec<f64> {
        self.pixels.borrow().iter().map(|p| p.1).collect()
    }

    /// Frame shapes handed to point matching.
    pub fn seen_dims(&self) -> Vec<[usize; 2]> {
        self.seen.borrow().clone()
    }
}

impl<B: Backend> RegistrationEngine<B> for ScriptedEngine {
    fn point_match(
        &self,
        reference: &Tensor<B, 2>,
        moving: &Tensor<B, 2>,
        _family: TransformFamily,
    ) -> Result<PointMatch> {
        self.seen.borrow_mut().push(reference.dims());
        let first = |frame: &Tensor<B, 2>| -> Result<f64> {
            Ok(to_host(frame)?.first().copied().unwrap_or(f64::NAN))
        };
        self.pixels.borrow_mut().push((first(reference)?, first(moving)?));
        let next = self.script.borrow_mut().pop_front();
        let matrix = match (next, self.fallback) {
            (Some(Ok(matrix)), _) => matrix,
            (Some(Err(message)), _) => return Err(RegistrationError::engine(message)),
            (None, Some(matrix)) => matrix,
            (None, None) => return Err(RegistrationError::engine("script exhausted")),
        };
        let origin = Point2::origin();
        Ok(PointMatch {
            matrix,
            reference_points: vec![origin],
            moving_points: vec![matrix.map_point(&origin)],
        })
    }

    fn warp(&self, image: &Tensor<B, 2>, _matrix: &CompactMatrix) -> Result<Tensor<B, 2>> {
        Ok(image.clone())
    }
}

//! Stack registration and stack transformation.

use std::ops::Index;
use std::slice;

use burn::tensor::backend::Backend;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use stackreg_core::transform::compose;
use stackreg_core::{running_mean, ImageStack};

use crate::config::{ReferenceMode, StackRegConfig};
use crate::engine::RegistrationEngine;
use crate::error::{RegistrationError, Result};
use crate::registrar::StackReg;
use crate::validation::{validate_stack_config, validate_warp_dims};

/// One canonical matrix per frame, indexed like the frames of the stack.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformStack(Vec<Matrix3<f64>>);

impl TransformStack {
    /// Wrap one matrix per frame.
    pub fn new(matrices: Vec<Matrix3<f64>>) -> Self {
        Self(matrices)
    }

    /// `len` identity matrices.
    pub fn identity(len: usize) -> Self {
        Self(vec![Matrix3::identity(); len])
    }

    /// Number of frames covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the stack holds no matrices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Matrix of frame `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Matrix3<f64>> {
        self.0.get(index)
    }

    /// Iterate over the matrices in frame order.
    pub fn iter(&self) -> slice::Iter<'_, Matrix3<f64>> {
        self.0.iter()
    }

    /// Matrices as a slice.
    pub fn as_slice(&self) -> &[Matrix3<f64>] {
        &self.0
    }

    /// Consume the stack and return the matrices.
    pub fn into_inner(self) -> Vec<Matrix3<f64>> {
        self.0
    }
}

impl Index<usize> for TransformStack {
    type Output = Matrix3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Matrix3<f64>>> for TransformStack {
    fn from(matrices: Vec<Matrix3<f64>>) -> Self {
        Self(matrices)
    }
}

impl<'a> IntoIterator for &'a TransformStack {
    type Item = &'a Matrix3<f64>;
    type IntoIter = slice::Iter<'a, Matrix3<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<B: Backend, E: RegistrationEngine<B>> StackReg<B, E> {
    /// Register every frame of `stack` along `config.axis`.
    ///
    /// Frames that are not registered keep the identity matrix. Under
    /// [`ReferenceMode::Previous`] each matrix is chained onto its
    /// predecessor, so every entry maps into the coordinates of frame 0.
    /// On failure no matrices are stored.
    pub fn register_stack(&mut self, stack: &ImageStack<B>, config: &StackRegConfig) -> Result<TransformStack> {
        validate_stack_config(config, stack)?;
        let axis = config.axis;
        let frames = stack.frame_count(axis)?;

        let (working, mut start) = if config.smooths() {
            (running_mean(stack, config.moving_average, axis)?, 0)
        } else {
            (stack.clone(), 1)
        };

        let fixed_reference = match config.reference {
            ReferenceMode::Previous => {
                start = start.max(1);
                None
            }
            ReferenceMode::First => Some(working.mean_frames(axis, 0..config.n_frames)?),
            ReferenceMode::Mean => {
                start = 0;
                Some(working.mean(axis)?)
            }
        };

        tracing::info!(
            family = %self.family(),
            reference = %config.reference,
            frames,
            start,
            moving_average = config.moving_average,
            "registering stack"
        );

        let total = frames - start;
        self.progress.start();

        let mut seed = Vec::with_capacity(frames);
        seed.resize(start, Matrix3::identity());

        let result = (start..frames).try_fold(
            seed,
            |mut matrices: Vec<Matrix3<f64>>, i| -> Result<Vec<Matrix3<f64>>> {
                let moving = working.frame(axis, i)?;
                let reference = match &fixed_reference {
                    Some(reference) => reference.clone(),
                    None => working.frame(axis, i - 1)?,
                };

                let local = self.register_pair(&reference, &moving)?.matrix()?;
                let matrix = match config.reference {
                    ReferenceMode::Previous => compose(&local, &matrices[i - 1]),
                    ReferenceMode::First | ReferenceMode::Mean => local,
                };
                tracing::debug!(frame = i, ?matrix, "registered frame");

                matrices.push(matrix);
                self.progress.update(i + 1 - start, Some(total));
                Ok(matrices)
            },
        );

        let matrices = match result {
            Ok(matrices) => matrices,
            Err(e) => {
                self.progress.error(&e.to_string());
                return Err(e);
            }
        };

        self.progress.complete(total);
        let tmats = TransformStack::new(matrices);
        self.tmats = Some(tmats.clone());
        Ok(tmats)
    }

    /// Warp every raw frame of `stack` along `axis` with its matrix.
    ///
    /// Uses the matrices of the last `register_stack` call when `matrices`
    /// is `None`.
    pub fn transform_stack(
        &self,
        stack: &ImageStack<B>,
        axis: usize,
        matrices: Option<&TransformStack>,
    ) -> Result<ImageStack<B>> {
        let tmats = matrices
            .or(self.tmats.as_ref())
            .ok_or(RegistrationError::NotRegistered)?;

        let frames = stack.frame_count(axis)?;
        validate_warp_dims(stack.frame_dims(axis)?)?;
        if tmats.len() != frames {
            return Err(RegistrationError::LengthMismatch {
                matrices: tmats.len(),
                frames,
            });
        }

        let mut warped = Vec::with_capacity(frames);
        for (i, matrix) in tmats.iter().enumerate() {
            let frame = stack.frame(axis, i)?;
            warped.push(self.transform(&frame, Some(matrix))?);
        }

        Ok(ImageStack::from_frames(warped, axis)?)
    }

    /// Register `stack`, then warp its raw frames with the new matrices.
    pub fn register_transform_stack(&mut self, stack: &ImageStack<B>, config: &StackRegConfig) -> Result<ImageStack<B>> {
        let tmats = self.register_stack(stack, config)?;
        self.transform_stack(stack, config.axis, Some(&tmats))
    }
}

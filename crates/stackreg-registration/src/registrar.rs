//! Single-pair registrar.
//!
//! `StackReg` owns the transformation family, the engine and the state of
//! the last registration. Canonical matrices go in and out of its public
//! surface; compact matrices only travel between the registrar and the
//! engine.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use nalgebra::{Matrix3, Point2};
use stackreg_core::image::crop_last_row_col;
use stackreg_core::transform::to_compact;
use stackreg_core::{CompactMatrix, CoreError, TransformFamily};

use crate::engine::{MomentEngine, RegistrationEngine};
use crate::error::{RegistrationError, Result};
use crate::progress::ProgressTracker;
use crate::stack::TransformStack;
use crate::validation::{validate_frame_pair, validate_warp_dims};

/// Result of registering one moving frame against one reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRegistration {
    family: TransformFamily,
    compact: CompactMatrix,
    reference_points: Vec<Point2<f64>>,
    moving_points: Vec<Point2<f64>>,
}

impl PairRegistration {
    /// Family the matrix was estimated for.
    pub fn family(&self) -> TransformFamily {
        self.family
    }

    /// Engine-native matrix.
    ///
    /// Layout is family specific and only meaningful to a
    /// [`RegistrationEngine`]; use [`PairRegistration::matrix`] for the
    /// canonical form.
    pub fn compact(&self) -> &CompactMatrix {
        &self.compact
    }

    /// Canonical 3x3 matrix.
    ///
    /// Fails with an unsupported-representation error for bilinear results.
    pub fn matrix(&self) -> Result<Matrix3<f64>> {
        Ok(self.compact.to_canonical(self.family)?)
    }

    /// Landmarks in the reference frame.
    pub fn reference_points(&self) -> &[Point2<f64>] {
        &self.reference_points
    }

    /// Landmarks in the moving frame, paired by index with the reference landmarks.
    pub fn moving_points(&self) -> &[Point2<f64>] {
        &self.moving_points
    }
}

/// Registrar for frame pairs and image stacks.
///
/// # Examples
/// ```rust
/// use burn::tensor::{Tensor, TensorData};
/// use burn_ndarray::NdArray;
/// use stackreg_core::TransformFamily;
/// use stackreg_registration::{MomentEngine, StackReg};
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let mut frame = vec![0.0f32; 16 * 16];
/// frame[5 * 16 + 6] = 1.0;
/// let reference = Tensor::<Backend, 2>::from_data(TensorData::new(frame, [16, 16]), &device);
///
/// let mut sr = StackReg::<Backend, _>::new(TransformFamily::Translation, MomentEngine::new());
/// sr.register(&reference, &reference).unwrap();
/// assert!(sr.is_registered());
/// assert_eq!(sr.matrix().unwrap(), nalgebra::Matrix3::identity());
/// ```
#[derive(Debug)]
pub struct StackReg<B: Backend, E = MomentEngine> {
    family: TransformFamily,
    engine: E,
    current: Option<CompactMatrix>,
    last: Option<PairRegistration>,
    pub(crate) tmats: Option<TransformStack>,
    pub(crate) progress: ProgressTracker,
    _backend: PhantomData<B>,
}

impl<B: Backend, E: RegistrationEngine<B>> StackReg<B, E> {
    /// Create a registrar for `family`.
    pub fn new(family: TransformFamily, engine: E) -> Self {
        Self {
            family,
            engine,
            current: None,
            last: None,
            tmats: None,
            progress: ProgressTracker::new(),
            _backend: PhantomData,
        }
    }

    /// Create a registrar from an engine family code.
    pub fn from_code(code: u8, engine: E) -> Result<Self> {
        Ok(Self::new(TransformFamily::from_code(code)?, engine))
    }

    /// Report stack progress through `progress`.
    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = progress;
        self
    }

    /// Transformation family fixed at construction.
    pub fn family(&self) -> TransformFamily {
        self.family
    }

    /// Engine used for point matching and warping.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether `register` has completed successfully on this registrar.
    pub fn is_registered(&self) -> bool {
        self.last.is_some()
    }

    /// Register `moving` against `reference` without touching registrar state.
    ///
    /// The last row and column are cropped from both frames before the
    /// engine sees them.
    pub fn register_pair(&self, reference: &Tensor<B, 2>, moving: &Tensor<B, 2>) -> Result<PairRegistration> {
        validate_frame_pair(reference, moving)?;

        let reference = crop_last_row_col(reference.clone())?;
        let moving = crop_last_row_col(moving.clone())?;

        let matched = self.engine.point_match(&reference, &moving, self.family)?;
        if !matched.matrix.matches(self.family) {
            return Err(CoreError::unexpected_transformation(format!(
                "engine returned {:?} for a {} registration",
                matched.matrix, self.family
            ))
            .into());
        }
        if matched.reference_points.len() != matched.moving_points.len() {
            return Err(RegistrationError::engine(format!(
                "engine returned {} reference points and {} moving points",
                matched.reference_points.len(),
                matched.moving_points.len()
            )));
        }

        Ok(PairRegistration {
            family: self.family,
            compact: matched.matrix,
            reference_points: matched.reference_points,
            moving_points: matched.moving_points,
        })
    }

    /// Register `moving` against `reference` and keep the result as the
    /// current matrix and points.
    pub fn register(&mut self, reference: &Tensor<B, 2>, moving: &Tensor<B, 2>) -> Result<PairRegistration> {
        let registration = self.register_pair(reference, moving)?;
        tracing::debug!(family = %self.family, matrix = ?registration.compact, "registered pair");
        self.current = Some(registration.compact);
        self.last = Some(registration.clone());
        Ok(registration)
    }

    /// Warp `moving` with `matrix`, or with the current matrix when `None`.
    pub fn transform(&self, moving: &Tensor<B, 2>, matrix: Option<&Matrix3<f64>>) -> Result<Tensor<B, 2>> {
        let compact = match matrix {
            Some(mat) => to_compact(mat, self.family)?,
            None => self.current.ok_or(RegistrationError::NotRegistered)?,
        };
        self.warp(moving, &compact)
    }

    /// Warp `moving` with an explicit registration result.
    ///
    /// Works for every family, including bilinear.
    pub fn transform_with(&self, moving: &Tensor<B, 2>, registration: &PairRegistration) -> Result<Tensor<B, 2>> {
        self.warp(moving, &registration.compact)
    }

    /// Register, then warp `moving` with the freshly computed matrix.
    pub fn register_transform(&mut self, reference: &Tensor<B, 2>, moving: &Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let registration = self.register(reference, moving)?;
        self.transform_with(moving, &registration)
    }

    /// Current matrix in canonical form.
    pub fn matrix(&self) -> Result<Matrix3<f64>> {
        let compact = self.current.ok_or(RegistrationError::NotRegistered)?;
        Ok(compact.to_canonical(self.family)?)
    }

    /// Replace the current matrix.
    ///
    /// Enables `transform(moving, None)` but does not mark the registrar
    /// as registered.
    pub fn set_matrix(&mut self, matrix: &Matrix3<f64>) -> Result<()> {
        self.current = Some(to_compact(matrix, self.family)?);
        Ok(())
    }

    /// Correspondence points of the last `register` call.
    pub fn points(&self) -> Option<(&[Point2<f64>], &[Point2<f64>])> {
        self.last
            .as_ref()
            .map(|r| (r.reference_points(), r.moving_points()))
    }

    /// Last `register` result.
    pub fn last_registration(&self) -> Option<&PairRegistration> {
        self.last.as_ref()
    }

    /// Matrices of the last successful stack registration.
    pub fn transform_matrices(&self) -> Option<&TransformStack> {
        self.tmats.as_ref()
    }

    fn warp(&self, moving: &Tensor<B, 2>, compact: &CompactMatrix) -> Result<Tensor<B, 2>> {
        validate_warp_dims(moving.dims())?;
        let warped = self.engine.warp(moving, compact)?;
        if warped.dims() != moving.dims() {
            return Err(RegistrationError::ShapeMismatch {
                expected: moving.dims().to_vec(),
                actual: warped.dims().to_vec(),
            });
        }
        Ok(warped)
    }
}

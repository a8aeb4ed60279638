//! Moment-based reference engine.
//!
//! Estimates transforms from the intensity moments of background-subtracted
//! frames: the centroid gives the translation, the principal axis of the
//! second central moments gives the rotation, and the ratio of the second
//! moments gives an isotropic scale. This is enough for sequences of a
//! single bright object (cells, planetary disks, beads) and keeps the crate
//! usable without a native point-matching engine.

use std::f64::consts::{FRAC_PI_2, PI};

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use nalgebra::{Matrix2, Matrix2x3, Point2, Vector2};
use stackreg_core::image::{generate_grid_2d, to_host};
use stackreg_core::interpolation::{Interpolator, LinearInterpolator};
use stackreg_core::{CompactMatrix, TransformFamily};

use super::{PointMatch, RegistrationEngine};
use crate::error::{RegistrationError, Result};
use crate::validation::validate_warp_dims;

/// Total background-subtracted intensity below which a frame has no signal.
const MIN_MASS: f64 = 1e-9;

/// Moment-based point matching with interpolated warping.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentEngine<I = LinearInterpolator> {
    interpolator: I,
}

impl MomentEngine {
    /// Create an engine warping with bilinear interpolation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I> MomentEngine<I> {
    /// Replace the interpolator used by [`RegistrationEngine::warp`].
    pub fn with_interpolator<J>(self, interpolator: J) -> MomentEngine<J> {
        MomentEngine { interpolator }
    }
}

/// Intensity moments of a frame, in pixel coordinates (x = column, y = row).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Moments {
    centroid: Point2<f64>,
    mu20: f64,
    mu02: f64,
    mu11: f64,
}

impl Moments {
    fn from_pixels(values: &[f64], [rows, cols]: [usize; 2]) -> Result<Self> {
        let background = values.iter().copied().fold(f64::INFINITY, f64::min);

        let (mut mass, mut sx, mut sy) = (0.0, 0.0, 0.0);
        for (k, v) in values.iter().enumerate() {
            let w = v - background;
            let (x, y) = ((k % cols) as f64, (k / cols) as f64);
            mass += w;
            sx += w * x;
            sy += w * y;
        }
        if !mass.is_finite() || mass <= MIN_MASS {
            return Err(RegistrationError::engine(format!(
                "{rows}x{cols} frame has no signal above background"
            )));
        }
        let centroid = Point2::new(sx / mass, sy / mass);

        let (mut mu20, mut mu02, mut mu11) = (0.0, 0.0, 0.0);
        for (k, v) in values.iter().enumerate() {
            let w = v - background;
            let dx = (k % cols) as f64 - centroid.x;
            let dy = (k / cols) as f64 - centroid.y;
            mu20 += w * dx * dx;
            mu02 += w * dy * dy;
            mu11 += w * dx * dy;
        }

        Ok(Self {
            centroid,
            mu20: mu20 / mass,
            mu02: mu02 / mass,
            mu11: mu11 / mass,
        })
    }

    /// Angle of the principal axis, in `(-pi/2, pi/2]`.
    fn orientation(&self) -> f64 {
        0.5 * (2.0 * self.mu11).atan2(self.mu20 - self.mu02)
    }

    /// Trace of the second-moment matrix.
    fn spread(&self) -> f64 {
        self.mu20 + self.mu02
    }

    /// Eigenvalue gap of the second-moment matrix.
    fn anisotropy(&self) -> f64 {
        ((self.mu20 - self.mu02).powi(2) + 4.0 * self.mu11 * self.mu11).sqrt()
    }

    fn principal_axis(&self) -> Vector2<f64> {
        let (s, c) = self.orientation().sin_cos();
        Vector2::new(c, s) * self.spread().sqrt()
    }
}

fn wrap_half_turn(angle: f64) -> f64 {
    let a = angle % PI;
    if a > FRAC_PI_2 {
        a - PI
    } else if a <= -FRAC_PI_2 {
        a + PI
    } else {
        a
    }
}

fn rotation_about(reference: &Moments, moving: &Moments, scale: f64) -> CompactMatrix {
    let theta = wrap_half_turn(moving.orientation() - reference.orientation());
    let (s, c) = theta.sin_cos();
    let linear = Matrix2::new(c, -s, s, c) * scale;
    let t = moving.centroid.coords - linear * reference.centroid.coords;
    CompactMatrix::Affine(Matrix2x3::new(
        t.x, linear[(0, 0)], linear[(0, 1)],
        t.y, linear[(1, 0)], linear[(1, 1)],
    ))
}

impl<B: Backend, I: Interpolator<B>> RegistrationEngine<B> for MomentEngine<I> {
    fn point_match(
        &self,
        reference: &Tensor<B, 2>,
        moving: &Tensor<B, 2>,
        family: TransformFamily,
    ) -> Result<PointMatch> {
        let dims = reference.dims();
        if moving.dims() != dims {
            return Err(RegistrationError::ShapeMismatch {
                expected: dims.to_vec(),
                actual: moving.dims().to_vec(),
            });
        }

        let r = Moments::from_pixels(&to_host(reference)?, dims)?;
        let m = Moments::from_pixels(&to_host(moving)?, dims)?;

        let (matrix, reference_points) = match family {
            TransformFamily::Translation => (
                CompactMatrix::Translation(m.centroid - r.centroid),
                vec![r.centroid],
            ),
            TransformFamily::RigidBody | TransformFamily::ScaledRotation => {
                if r.anisotropy() <= 1e-6 * r.spread() {
                    tracing::warn!("reference frame is isotropic; rotation is ill-defined");
                }
                let scale = if family == TransformFamily::ScaledRotation {
                    if r.spread() <= MIN_MASS {
                        return Err(RegistrationError::engine("reference frame has no spatial extent"));
                    }
                    (m.spread() / r.spread()).sqrt()
                } else {
                    1.0
                };
                let axis = r.principal_axis();
                (
                    rotation_about(&r, &m, scale),
                    vec![r.centroid, r.centroid + axis, r.centroid - axis],
                )
            }
            TransformFamily::Affine | TransformFamily::Bilinear => {
                return Err(RegistrationError::engine(format!(
                    "moment engine cannot estimate {family} transforms"
                )));
            }
        };

        let moving_points = reference_points.iter().map(|p| matrix.map_point(p)).collect();
        tracing::debug!(?family, ?matrix, "moment point match");

        Ok(PointMatch {
            matrix,
            reference_points,
            moving_points,
        })
    }

    fn warp(&self, image: &Tensor<B, 2>, matrix: &CompactMatrix) -> Result<Tensor<B, 2>> {
        let [rows, cols] = image.dims();
        validate_warp_dims([rows, cols])?;
        let device = image.device();

        let grid = generate_grid_2d::<B>([rows, cols], &device);
        let x = grid.clone().narrow(1, 0, 1);
        let y = grid.narrow(1, 1, 1);
        let xy = x.clone() * y.clone();

        let map = |c: [f64; 4]| {
            x.clone().mul_scalar(c[1]) + y.clone().mul_scalar(c[2]) + xy.clone().mul_scalar(c[3])
                + c[0]
        };
        let [cx, cy] = matrix.coefficients();
        let coords = Tensor::cat(vec![map(cx), map(cy)], 1);

        Ok(self.interpolator.interpolate(image, coords).reshape([rows, cols]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;
    use stackreg_core::interpolation::NearestNeighborInterpolator;

    type B = NdArray<f32>;

    /// Anisotropic Gaussian blob centred at (cx, cy) with its long axis at `angle`.
    fn blob(cx: f64, cy: f64, angle: f64, sx: f64, sy: f64) -> Tensor<B, 2> {
        let n = 64;
        let (s, c) = angle.sin_cos();
        let mut values = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let (dx, dy) = (col as f64 - cx, row as f64 - cy);
                let u = c * dx + s * dy;
                let v = -s * dx + c * dy;
                values.push((-(u * u) / (2.0 * sx * sx) - (v * v) / (2.0 * sy * sy)).exp() as f32);
            }
        }
        Tensor::from_data(TensorData::new(values, [n, n]), &Default::default())
    }

    #[test]
    fn test_translation_from_centroids() {
        let engine = MomentEngine::new();
        let reference = blob(30.0, 32.0, 0.0, 4.0, 4.0);
        let moving = blob(33.0, 30.0, 0.0, 4.0, 4.0);
        let result = engine.point_match(&reference, &moving, TransformFamily::Translation).unwrap();
        match result.matrix {
            CompactMatrix::Translation(t) => {
                assert!((t.x - 3.0).abs() < 1e-3, "tx = {}", t.x);
                assert!((t.y + 2.0).abs() < 1e-3, "ty = {}", t.y);
            }
            other => panic!("unexpected layout {other:?}"),
        }
        assert_eq!(result.reference_points.len(), 1);
        assert_eq!(result.moving_points.len(), 1);
    }

    #[test]
    fn test_rigid_recovers_rotation() {
        let engine = MomentEngine::new();
        let reference = blob(32.0, 32.0, 0.0, 7.0, 2.5);
        let moving = blob(34.0, 30.0, 0.3, 7.0, 2.5);
        let result = engine.point_match(&reference, &moving, TransformFamily::RigidBody).unwrap();
        let mat = result.matrix.to_canonical(TransformFamily::RigidBody).unwrap();
        let angle = mat[(1, 0)].atan2(mat[(0, 0)]);
        assert!((angle - 0.3).abs() < 0.01, "angle = {angle}");

        let centre = result.matrix.map_point(&Point2::new(32.0, 32.0));
        assert!((centre - Point2::new(34.0, 30.0)).norm() < 0.05);
        assert_eq!(result.reference_points.len(), result.moving_points.len());
    }

    #[test]
    fn test_scaled_rotation_recovers_scale() {
        let engine = MomentEngine::new();
        let reference = blob(32.0, 32.0, 0.2, 6.0, 2.5);
        let moving = blob(32.0, 32.0, 0.2, 7.5, 3.125);
        let result = engine.point_match(&reference, &moving, TransformFamily::ScaledRotation).unwrap();
        let mat = result.matrix.to_canonical(TransformFamily::ScaledRotation).unwrap();
        let scale = (mat[(0, 0)].powi(2) + mat[(1, 0)].powi(2)).sqrt();
        assert!((scale - 1.25).abs() < 0.02, "scale = {scale}");
    }

    #[test]
    fn test_rejects_unsupported_families() {
        let engine = MomentEngine::new();
        let frame = blob(32.0, 32.0, 0.0, 4.0, 4.0);
        for family in [TransformFamily::Affine, TransformFamily::Bilinear] {
            assert!(matches!(
                engine.point_match(&frame, &frame, family),
                Err(RegistrationError::EngineError(_))
            ));
        }
    }

    #[test]
    fn test_flat_frame_has_no_signal() {
        let engine = MomentEngine::new();
        let flat = Tensor::<B, 2>::full([16, 16], 7.0, &Default::default());
        assert!(matches!(
            engine.point_match(&flat, &flat, TransformFamily::Translation),
            Err(RegistrationError::EngineError(_))
        ));
    }

    #[test]
    fn test_identity_warp_is_exact() {
        let frame = blob(20.0, 40.0, 0.4, 6.0, 2.0);
        let expected = to_host(&frame).unwrap();
        for family in TransformFamily::ALL {
            let warped = MomentEngine::new().warp(&frame, &CompactMatrix::identity(family)).unwrap();
            assert_eq!(warped.dims(), [64, 64]);
            assert_eq!(to_host(&warped).unwrap(), expected);
        }
    }

    #[test]
    fn test_warp_rejects_empty_frame() {
        let empty = Tensor::<B, 2>::zeros([3, 0], &Default::default());
        let identity = CompactMatrix::identity(TransformFamily::Translation);
        assert!(MomentEngine::new().warp(&empty, &identity).is_err());
    }

    #[test]
    fn test_integer_shift_warp() {
        let device = Default::default();
        let frame = Tensor::<B, 2>::from_floats([[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]], &device);
        let shift = CompactMatrix::Translation(Vector2::new(1.0, 0.0));
        let engine = MomentEngine::new().with_interpolator(NearestNeighborInterpolator::new());
        let warped = to_host(&engine.warp(&frame, &shift).unwrap()).unwrap();
        // out(x, y) = in(x + 1, y), clamped at the right border
        assert_eq!(warped, vec![1.0, 2.0, 2.0, 4.0, 5.0, 5.0]);
    }
}

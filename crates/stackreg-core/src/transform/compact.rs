//! Compact (engine-native) transform matrices and their conversion to the
//! canonical 3x3 homogeneous form.
//!
//! Compact matrices store one row per output coordinate and one column per
//! monomial, in the order `1, x, y, xy`. They map reference (output) pixel
//! coordinates to moving (source) pixel coordinates:
//!
//! ```text
//! Translation   [tx]              x' = x + tx
//!               [ty]
//! Affine        [tx a00 a01]      x' = tx + a00 x + a01 y
//!               [ty a10 a11]
//! Bilinear      [c0 c1 c2 c3]     x' = c0 + c1 x + c2 y + c3 xy
//!               [d0 d1 d2 d3]
//! ```
//!
//! The canonical form moves the constant column last:
//!
//! ```text
//! [a00 a01 tx]
//! [a10 a11 ty]
//! [ 0   0   1]
//! ```

use nalgebra::{Matrix2x3, Matrix2x4, Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::family::TransformFamily;
use crate::error::{CoreError, Result};

/// Family-specific parameterization used by the registration engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompactMatrix {
    /// 2x1 translation vector.
    Translation(Vector2<f64>),
    /// 2x3 `[t | A]`, shared by rigid body, scaled rotation and affine.
    Affine(Matrix2x3<f64>),
    /// 2x4 bilinear coefficients.
    Bilinear(Matrix2x4<f64>),
}

impl CompactMatrix {
    /// The compact matrix that leaves every point in place.
    pub fn identity(family: TransformFamily) -> Self {
        match family {
            TransformFamily::Translation => Self::Translation(Vector2::zeros()),
            TransformFamily::RigidBody
            | TransformFamily::ScaledRotation
            | TransformFamily::Affine => Self::Affine(Matrix2x3::new(
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            )),
            TransformFamily::Bilinear => Self::Bilinear(Matrix2x4::new(
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0,
            )),
        }
    }

    /// Convert to the canonical 3x3 homogeneous matrix.
    pub fn to_canonical(&self, family: TransformFamily) -> Result<Matrix3<f64>> {
        match (family, self) {
            (TransformFamily::Bilinear, _) => Err(CoreError::UnsupportedRepresentation(family)),
            (TransformFamily::Translation, Self::Translation(t)) => {
                let mut mat = Matrix3::identity();
                mat[(0, 2)] = t[0];
                mat[(1, 2)] = t[1];
                Ok(mat)
            }
            (
                TransformFamily::RigidBody | TransformFamily::ScaledRotation | TransformFamily::Affine,
                Self::Affine(m),
            ) => Ok(Matrix3::new(
                m[(0, 1)], m[(0, 2)], m[(0, 0)],
                m[(1, 1)], m[(1, 2)], m[(1, 0)],
                0.0, 0.0, 1.0,
            )),
            (family, compact) => Err(CoreError::unexpected_transformation(format!(
                "{} compact matrix cannot describe a {family} transform",
                compact.layout_name()
            ))),
        }
    }

    /// Convert a canonical 3x3 homogeneous matrix to the family's compact form.
    pub fn from_canonical(canonical: &Matrix3<f64>, family: TransformFamily) -> Result<Self> {
        match family {
            TransformFamily::Translation => Ok(Self::Translation(Vector2::new(
                canonical[(0, 2)],
                canonical[(1, 2)],
            ))),
            TransformFamily::RigidBody | TransformFamily::ScaledRotation | TransformFamily::Affine => {
                Ok(Self::Affine(Matrix2x3::new(
                    canonical[(0, 2)], canonical[(0, 0)], canonical[(0, 1)],
                    canonical[(1, 2)], canonical[(1, 0)], canonical[(1, 1)],
                )))
            }
            TransformFamily::Bilinear => Err(CoreError::UnsupportedRepresentation(family)),
        }
    }

    /// Whether this layout is the one the family uses.
    pub fn matches(&self, family: TransformFamily) -> bool {
        matches!(
            (family, self),
            (TransformFamily::Translation, Self::Translation(_))
                | (
                    TransformFamily::RigidBody
                        | TransformFamily::ScaledRotation
                        | TransformFamily::Affine,
                    Self::Affine(_)
                )
                | (TransformFamily::Bilinear, Self::Bilinear(_))
        )
    }

    /// Coefficients of `1, x, y, xy` for each output coordinate.
    pub fn coefficients(&self) -> [[f64; 4]; 2] {
        match self {
            Self::Translation(t) => [[t[0], 1.0, 0.0, 0.0], [t[1], 0.0, 1.0, 0.0]],
            Self::Affine(m) => [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)], 0.0],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)], 0.0],
            ],
            Self::Bilinear(m) => [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)], m[(1, 3)]],
            ],
        }
    }

    /// Map a reference-frame point into the moving frame.
    pub fn map_point(&self, p: &Point2<f64>) -> Point2<f64> {
        let [cx, cy] = self.coefficients();
        let eval = |c: [f64; 4]| c[0] + c[1] * p.x + c[2] * p.y + c[3] * p.x * p.y;
        Point2::new(eval(cx), eval(cy))
    }

    fn layout_name(&self) -> &'static str {
        match self {
            Self::Translation(_) => "2x1 translation",
            Self::Affine(_) => "2x3 affine",
            Self::Bilinear(_) => "2x4 bilinear",
        }
    }
}

/// Convert a compact matrix to canonical form for `family`.
pub fn to_canonical(compact: &CompactMatrix, family: TransformFamily) -> Result<Matrix3<f64>> {
    compact.to_canonical(family)
}

/// Convert a canonical matrix to the compact form used for `family`.
pub fn to_compact(canonical: &Matrix3<f64>, family: TransformFamily) -> Result<CompactMatrix> {
    CompactMatrix::from_canonical(canonical, family)
}

//! Helpers for canonical 3x3 homogeneous matrices.

use nalgebra::{Matrix3, Vector2};

/// Chain a frame-to-previous matrix onto the accumulated matrix of the
/// previous frame.
///
/// The result maps root-frame coordinates into the current frame:
/// `local * accumulated`.
pub fn compose(local: &Matrix3<f64>, accumulated: &Matrix3<f64>) -> Matrix3<f64> {
    local * accumulated
}

/// Translation column of a homogeneous matrix.
pub fn translation(mat: &Matrix3<f64>) -> Vector2<f64> {
    Vector2::new(mat[(0, 2)], mat[(1, 2)])
}

/// Whether `mat` equals the identity within `tolerance` (max-abs norm).
pub fn is_identity(mat: &Matrix3<f64>, tolerance: f64) -> bool {
    (mat - Matrix3::identity()).amax() <= tolerance
}

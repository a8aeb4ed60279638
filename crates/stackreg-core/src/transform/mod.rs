//! Transform families and matrix conventions.
//!
//! This module provides the transformation families, the compact
//! engine-native matrices and their conversion to canonical 3x3
//! homogeneous matrices.

pub mod family;
pub mod compact;
pub mod homogeneous;

pub use family::TransformFamily;
pub use compact::{to_canonical, to_compact, CompactMatrix};
pub use homogeneous::compose;

//! Transformation families.
//!
//! A family fixes the degrees of freedom of a 2D transform and the compact
//! layout the registration engine uses for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Geometric transform class used for registration.
///
/// The numeric codes match the engine's historical identifiers
/// (the number of free parameters, except for rigid body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformFamily {
    /// Translation only: `x' = x + t`.
    Translation,
    /// Rotation and translation.
    RigidBody,
    /// Isotropic scale, rotation and translation.
    ScaledRotation,
    /// General linear map and translation.
    Affine,
    /// Bilinear map: `x' = a + b x + c y + d xy` per output coordinate.
    Bilinear,
}

impl TransformFamily {
    /// All families, in increasing order of freedom.
    pub const ALL: [TransformFamily; 5] = [
        Self::Translation,
        Self::RigidBody,
        Self::ScaledRotation,
        Self::Affine,
        Self::Bilinear,
    ];

    /// Look up a family by its engine code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            2 => Ok(Self::Translation),
            3 => Ok(Self::RigidBody),
            4 => Ok(Self::ScaledRotation),
            6 => Ok(Self::Affine),
            8 => Ok(Self::Bilinear),
            other => Err(CoreError::invalid_family(format!(
                "unknown transformation code {other}"
            ))),
        }
    }

    /// Engine code for this family.
    pub fn code(self) -> u8 {
        match self {
            Self::Translation => 2,
            Self::RigidBody => 3,
            Self::ScaledRotation => 4,
            Self::Affine => 6,
            Self::Bilinear => 8,
        }
    }

    /// Number of free parameters.
    pub fn degrees_of_freedom(self) -> usize {
        match self {
            Self::Translation => 2,
            Self::RigidBody => 3,
            Self::ScaledRotation => 4,
            Self::Affine => 6,
            Self::Bilinear => 8,
        }
    }

    /// Whether the family has a 3x3 homogeneous equivalent.
    pub fn has_canonical_form(self) -> bool {
        !matches!(self, Self::Bilinear)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::RigidBody => "rigid_body",
            Self::ScaledRotation => "scaled_rotation",
            Self::Affine => "affine",
            Self::Bilinear => "bilinear",
        }
    }
}

impl fmt::Display for TransformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformFamily {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|family| family.name() == normalized)
            .ok_or_else(|| CoreError::invalid_family(format!("unknown transformation '{s}'")))
    }
}

impl TryFrom<u8> for TransformFamily {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

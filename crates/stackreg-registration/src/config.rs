//! Stack registration configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};

/// How the reference image for each frame is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Align each frame to its predecessor and chain the matrices.
    #[default]
    Previous,
    /// Align each frame to the mean of the first `n_frames` frames.
    First,
    /// Align each frame, including the first, to the mean of all frames.
    Mean,
}

impl ReferenceMode {
    fn name(self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::First => "first",
            Self::Mean => "mean",
        }
    }
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReferenceMode {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "previous" => Ok(Self::Previous),
            "first" => Ok(Self::First),
            "mean" => Ok(Self::Mean),
            _ => Err(RegistrationError::invalid_configuration(format!(
                "reference must be one of 'previous', 'first' or 'mean', got '{s}'"
            ))),
        }
    }
}

/// Parameters of a stack registration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackRegConfig {
    /// Reference selection policy.
    pub reference: ReferenceMode,
    /// Number of leading frames averaged into the reference under [`ReferenceMode::First`].
    pub n_frames: usize,
    /// Axis of the stack that indexes frames.
    pub axis: usize,
    /// Moving-average window applied before registration; `1` disables smoothing.
    pub moving_average: usize,
}

impl Default for StackRegConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceMode::Previous,
            n_frames: 1,
            axis: 0,
            moving_average: 1,
        }
    }
}

impl StackRegConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference mode.
    pub fn with_reference(mut self, reference: ReferenceMode) -> Self {
        self.reference = reference;
        self
    }

    /// Set the number of frames averaged for the `first` reference.
    pub fn with_n_frames(mut self, n_frames: usize) -> Self {
        self.n_frames = n_frames;
        self
    }

    /// Set the frame axis.
    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    /// Set the moving-average window.
    pub fn with_moving_average(mut self, window: usize) -> Self {
        self.moving_average = window;
        self
    }

    /// Whether the stack is smoothed before registration.
    pub fn smooths(&self) -> bool {
        self.moving_average > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StackRegConfig::default();
        assert_eq!(config.reference, ReferenceMode::Previous);
        assert_eq!(config.n_frames, 1);
        assert_eq!(config.axis, 0);
        assert_eq!(config.moving_average, 1);
        assert!(!config.smooths());
    }

    #[test]
    fn test_builder() {
        let config = StackRegConfig::new()
            .with_reference(ReferenceMode::First)
            .with_n_frames(3)
            .with_axis(2)
            .with_moving_average(5);
        assert_eq!(config.reference, ReferenceMode::First);
        assert_eq!(config.n_frames, 3);
        assert_eq!(config.axis, 2);
        assert!(config.smooths());
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!("previous".parse::<ReferenceMode>().unwrap(), ReferenceMode::Previous);
        assert_eq!(" Mean ".parse::<ReferenceMode>().unwrap(), ReferenceMode::Mean);
        let err = "last".parse::<ReferenceMode>().unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidConfiguration(_)));
        assert_eq!(ReferenceMode::First.to_string(), "first");
    }
}

//! Registration of image pairs and image stacks.
//!
//! [`StackReg`] registers a moving frame against a reference frame through a
//! [`RegistrationEngine`], converts the engine's compact matrices to
//! canonical 3x3 matrices, and extends pair registration to whole stacks
//! with `previous`, `first` and `mean` reference policies.

pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod registrar;
pub mod stack;
pub mod validation;

pub use config::{ReferenceMode, StackRegConfig};
pub use engine::{MomentEngine, PointMatch, RegistrationEngine};
pub use error::{RegistrationError, Result};
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker};
pub use registrar::{PairRegistration, StackReg};
pub use stack::TransformStack;

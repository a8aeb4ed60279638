pub mod running_mean;

pub use running_mean::{running_mean, RunningMeanFilter};

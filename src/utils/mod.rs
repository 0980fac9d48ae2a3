//! Utility functions shared by the smoothing models.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use optimization::{nelder_mead, nelder_mead_until, NelderMeadConfig, NelderMeadResult};

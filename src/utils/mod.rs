//! Utility functions
//!
//! - Separable Gaussian smoothing of complex volumes
//! - Image comparison metrics (RMSE, NRMSE, correlation)

pub mod smoothing;
pub mod metrics;

pub use smoothing::*;
pub use metrics::*;

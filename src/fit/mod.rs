//! Model fitting.
//!
//! Responsibilities:
//!
//! - fit an L2-regularized logistic regression by IRLS
//! - report convergence diagnostics for the fitted model

pub mod fitter;

pub use fitter::*;

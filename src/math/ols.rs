//! Least squares solver.
//!
//! The risk model is fit by iteratively reweighted least squares: every Newton
//! step of the logistic likelihood is a weighted linear regression
//!
//! ```text
//! minimize Σ w_i (z_i - x_i^T β)^2 + λ Σ_{j≥1} β_j^2
//! ```
//!
//! Callers scale rows by `sqrt(w_i)` and append `sqrt(λ)` ridge rows, which turns
//! the step into an ordinary (tall) least squares problem solved here via SVD.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

//! Mathematical utilities: feature scaling, least squares, and small scalar helpers.

pub mod ols;
pub mod scale;

pub use ols::*;
pub use scale::*;

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Logistic function, evaluated so that large |z| never overflows.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

//! Per-feature standardization (`(x - mean) / scale`).
//!
//! Scale is the population standard deviation. A constant column gets scale 1 so
//! it maps to zero instead of NaN.

use serde::{Deserialize, Serialize};

/// Threshold below which a column is treated as constant.
const MIN_SCALE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Learn means and scales from row-major samples.
    ///
    /// Returns `None` for an empty sample set or ragged rows.
    pub fn fit(rows: &[Vec<f64>]) -> Option<Self> {
        let first = rows.first()?;
        let d = first.len();
        if rows.iter().any(|r| r.len() != d) {
            return None;
        }
        let n = rows.len() as f64;

        let mut mean = vec![0.0; d];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0; d];
        for row in rows {
            for j in 0..d {
                let dv = row[j] - mean[j];
                var[j] += dv * dv;
            }
        }
        let scale = var
            .into_iter()
            .map(|v| {
                let s = (v / n).sqrt();
                if s < MIN_SCALE { 1.0 } else { s }
            })
            .collect();

        Some(Self { mean, scale })
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }
}

//! Synthetic applicant sample generation for fitting the risk model.
//!
//! Ground truth is a latent logit in which risk rises with age away from 40,
//! vehicle value and prior claims, and falls as credit score rises above 650.
//! A sample is labelled a loss when the logit plus Gaussian noise clears a
//! fixed threshold. Everything is drawn from a single seeded `StdRng`, so the
//! same `(seed, count)` always yields the same sample.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::DecisionError;

/// Age draws are uniform on `[AGE_MIN, AGE_MAX)`.
const AGE_MIN: i32 = 18;
const AGE_MAX: i32 = 80;

const VEHICLE_MEAN: f64 = 20_000.0;
const VEHICLE_SD: f64 = 8_000.0;
const VEHICLE_FLOOR: f64 = 3_000.0;
const VEHICLE_CAP: f64 = 80_000.0;

/// Prior claims draws are uniform on `[0, CLAIMS_MAX)`.
const CLAIMS_MAX: i32 = 5;

/// Credit score draws are uniform on `[CREDIT_MIN, CREDIT_MAX)`.
const CREDIT_MIN: i32 = 500;
const CREDIT_MAX: i32 = 800;

const LABEL_NOISE_SD: f64 = 0.5;
const LABEL_THRESHOLD: f64 = 0.5;

/// Latent logit coefficients: (age - 40), (value - 20000), claims, (credit - 650).
const W_AGE: f64 = 0.015;
const W_VALUE: f64 = 0.00002;
const W_CLAIMS: f64 = 0.6;
const W_CREDIT: f64 = -0.01;

/// Labelled training rows in model feature order:
/// `[age, vehicle_value, prior_claims, credit_score]`.
#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl TrainingSample {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().sum::<f64>() / self.labels.len() as f64
    }
}

/// Latent (noise-free) risk logit for one applicant.
pub fn latent_logit(age: f64, vehicle_value: f64, prior_claims: f64, credit_score: f64) -> f64 {
    W_AGE * (age - 40.0)
        + W_VALUE * (vehicle_value - VEHICLE_MEAN)
        + W_CLAIMS * prior_claims
        + W_CREDIT * (credit_score - 650.0)
}

pub fn generate_training_sample(seed: u64, count: usize) -> Result<TrainingSample, DecisionError> {
    if count == 0 {
        return Err(DecisionError::ModelUnavailable(
            "training sample count must be > 0".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let vehicle = Normal::new(VEHICLE_MEAN, VEHICLE_SD)
        .map_err(|e| DecisionError::ModelUnavailable(format!("vehicle value distribution error: {e}")))?;
    let noise = Normal::new(0.0, LABEL_NOISE_SD)
        .map_err(|e| DecisionError::ModelUnavailable(format!("label noise distribution error: {e}")))?;

    // Draw one column at a time so each feature has its own stretch of the stream.
    let ages: Vec<f64> = (0..count).map(|_| rng.gen_range(AGE_MIN..AGE_MAX) as f64).collect();
    let values: Vec<f64> = (0..count)
        .map(|_| vehicle.sample(&mut rng).clamp(VEHICLE_FLOOR, VEHICLE_CAP))
        .collect();
    let claims: Vec<f64> = (0..count).map(|_| rng.gen_range(0..CLAIMS_MAX) as f64).collect();
    let credit: Vec<f64> = (0..count)
        .map(|_| rng.gen_range(CREDIT_MIN..CREDIT_MAX) as f64)
        .collect();

    let mut features = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for i in 0..count {
        let logit = latent_logit(ages[i], values[i], claims[i], credit[i]);
        let y = if logit + noise.sample(&mut rng) > LABEL_THRESHOLD { 1.0 } else { 0.0 };
        features.push(vec![ages[i], values[i], claims[i], credit[i]]);
        labels.push(y);
    }

    Ok(TrainingSample { features, labels })
}

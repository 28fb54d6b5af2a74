//! Probability-of-loss scorer.
//!
//! The scorer is fit once, at process start, on a seeded synthetic sample and is
//! immutable afterwards. Scoring is then a pure function of the four numeric
//! profile fields; `gender` is never a feature.

use serde::Serialize;
use tracing::info;

use crate::data::generate_training_sample;
use crate::domain::{ApplicantProfile, RiskEstimate};
use crate::error::DecisionError;
use crate::fit::{FitOptions, fit_logistic};
use crate::math::{StandardScaler, sigmoid};

/// Model feature names, in design-matrix order.
pub const FEATURES: [&str; 4] = ["age", "vehicle_value", "prior_claims", "credit_score"];

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TRAINING_SAMPLES: usize = 500;

/// How the scorer's training sample is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingConfig {
    pub seed: u64,
    pub samples: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            samples: DEFAULT_TRAINING_SAMPLES,
        }
    }
}

/// Fit-time diagnostics, kept for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ScorerDiagnostics {
    pub seed: u64,
    pub samples: usize,
    pub positive_rate: f64,
    pub iterations: usize,
    pub training_accuracy: f64,
    pub log_loss: f64,
}

/// Standardize-then-logistic risk model.
#[derive(Debug, Clone, Serialize)]
pub struct RiskScorer {
    scaler: StandardScaler,
    /// Intercept first, then one weight per entry of `FEATURES`.
    coefficients: Vec<f64>,
    diagnostics: Option<ScorerDiagnostics>,
}

impl RiskScorer {
    /// Generate the synthetic sample and fit the model.
    pub fn fit(config: TrainingConfig) -> Result<Self, DecisionError> {
        let sample = generate_training_sample(config.seed, config.samples)?;
        let scaler = StandardScaler::fit(&sample.features)
            .ok_or_else(|| DecisionError::ModelUnavailable("cannot standardize training sample".into()))?;
        let standardized: Vec<Vec<f64>> = sample.features.iter().map(|r| scaler.transform(r)).collect();

        let fit = fit_logistic(&standardized, &sample.labels, &FitOptions::default())?;

        info!(
            seed = config.seed,
            samples = sample.len(),
            iterations = fit.iterations,
            accuracy = fit.training_accuracy,
            "risk model fitted"
        );

        Ok(Self {
            scaler,
            coefficients: fit.coefficients,
            diagnostics: Some(ScorerDiagnostics {
                seed: config.seed,
                samples: sample.len(),
                positive_rate: sample.positive_rate(),
                iterations: fit.iterations,
                training_accuracy: fit.training_accuracy,
                log_loss: fit.log_loss,
            }),
        })
    }

    /// Build a scorer from explicit parameters (no training).
    pub fn from_parts(scaler: StandardScaler, coefficients: Vec<f64>) -> Result<Self, DecisionError> {
        if scaler.mean.len() != FEATURES.len()
            || scaler.scale.len() != FEATURES.len()
            || coefficients.len() != FEATURES.len() + 1
        {
            return Err(DecisionError::ModelUnavailable(format!(
                "expected {} features and {} coefficients",
                FEATURES.len(),
                FEATURES.len() + 1
            )));
        }
        if coefficients.iter().chain(&scaler.mean).chain(&scaler.scale).any(|v| !v.is_finite()) {
            return Err(DecisionError::ModelUnavailable("non-finite model parameter".into()));
        }
        Ok(Self {
            scaler,
            coefficients,
            diagnostics: None,
        })
    }

    /// A scorer that returns `probability` for every profile.
    pub fn constant(probability: f64) -> Result<Self, DecisionError> {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(DecisionError::ModelUnavailable(format!(
                "constant probability must be in (0, 1) (got {probability})"
            )));
        }
        let scaler = StandardScaler {
            mean: vec![0.0; FEATURES.len()],
            scale: vec![1.0; FEATURES.len()],
        };
        let mut coefficients = vec![0.0; FEATURES.len() + 1];
        coefficients[0] = (probability / (1.0 - probability)).ln();
        Self::from_parts(scaler, coefficients)
    }

    /// Probability of loss for a profile, rounded to 4 decimals.
    pub fn score(&self, profile: &ApplicantProfile) -> RiskEstimate {
        let raw = [
            profile.age as f64,
            profile.vehicle_value,
            profile.prior_claims as f64,
            profile.credit_score as f64,
        ];
        let z = self.scaler.transform(&raw);
        let eta = self.coefficients[0]
            + self.coefficients[1..]
                .iter()
                .zip(&z)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        RiskEstimate::from_probability(sigmoid(eta))
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn diagnostics(&self) -> Option<&ScorerDiagnostics> {
        self.diagnostics.as_ref()
    }
}

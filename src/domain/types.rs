//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from JSON/NDJSON request files
//! - passed through the pipeline by reference
//! - written to the audit/feedback sink as structured payloads

use std::ops::RangeInclusive;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::math::round_to;

pub const AGE_RANGE: RangeInclusive<i32> = 16..=100;
pub const PRIOR_CLAIMS_RANGE: RangeInclusive<i32> = 0..=10;
pub const CREDIT_SCORE_RANGE: RangeInclusive<i32> = 300..=850;

/// Self-reported gender. Never a model feature; only the fairness heuristic reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    #[value(name = "M", alias = "m")]
    M,
    #[value(name = "F", alias = "f")]
    F,
    #[value(name = "X", alias = "x")]
    X,
}

/// Applicant attributes for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub customer_id: String,
    pub age: i32,
    pub vehicle_value: f64,
    pub prior_claims: i32,
    pub credit_score: i32,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl ApplicantProfile {
    /// Check every numeric field against its declared range.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_int("age", self.age, &AGE_RANGE)?;
        check_positive("vehicle_value", self.vehicle_value)?;
        check_int("prior_claims", self.prior_claims, &PRIOR_CLAIMS_RANGE)?;
        check_int("credit_score", self.credit_score, &CREDIT_SCORE_RANGE)?;
        Ok(())
    }
}

/// A bind request: the applicant plus the coverage they want written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwriteApplication {
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub requested_coverage: f64,
}

impl UnderwriteApplication {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.profile.validate()?;
        check_positive("requested_coverage", self.requested_coverage)
    }
}

fn check_int(field: &str, value: i32, range: &RangeInclusive<i32>) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!(
                "must be between {} and {} (got {value})",
                range.start(),
                range.end()
            ),
        ))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("must be a finite number > 0 (got {value})"),
        ))
    }
}

/// Model-estimated probability of loss, rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskEstimate(f64);

impl RiskEstimate {
    pub fn from_probability(p: f64) -> Self {
        RiskEstimate(round_to(p.clamp(0.0, 1.0), 4))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Shortest decimal form, always with a fractional part (`1.0`, `0.65`).
impl std::fmt::Display for RiskEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Base and risk-adjusted premium, both rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumQuote {
    pub base_premium: f64,
    pub final_premium: f64,
}

/// Quote-time (pre-bind) underwriting label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreDecision {
    AutoApprove,
    Refer,
    Reject,
}

impl PreDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            PreDecision::AutoApprove => "auto_approve",
            PreDecision::Refer => "refer",
            PreDecision::Reject => "reject",
        }
    }
}

/// Bind-time underwriting label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalDecision {
    Approved,
    Referred,
    Rejected,
}

impl FinalDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            FinalDecision::Approved => "approved",
            FinalDecision::Referred => "referred",
            FinalDecision::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PreDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label plus the reasons that produced it, in rule-evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome<L> {
    pub label: L,
    pub reasons: Vec<String>,
}

/// Response of `quote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub probability_of_loss: f64,
    pub base_premium: f64,
    pub final_premium: f64,
    pub decision: PreDecision,
    pub reasons: Vec<String>,
}

/// Response of `underwrite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwriteResult {
    pub decision: FinalDecision,
    pub reasons: Vec<String>,
}

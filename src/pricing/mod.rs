//! Premium pricing.
//!
//! ```text
//! value_factor     = clamp(vehicle_value / 20000, 0.5, 2.0)
//! base_premium     = round(300 * value_factor + 50 * prior_claims, 2)
//! risk_multiplier  = 1 + 2.5 * risk
//! final_premium    = round(base_premium * risk_multiplier, 2)
//! ```
//!
//! Since `risk ∈ [0, 1]`, the multiplier is at least 1 and the final premium never
//! undercuts the base premium.

use crate::domain::{ApplicantProfile, PremiumQuote, RiskEstimate};
use crate::math::round_to;

pub const BASE_RATE: f64 = 300.0;
pub const RISK_LOADING: f64 = 2.5;
pub const REFERENCE_VEHICLE_VALUE: f64 = 20_000.0;
pub const VALUE_FACTOR_MIN: f64 = 0.5;
pub const VALUE_FACTOR_MAX: f64 = 2.0;
pub const PRIOR_CLAIM_FEE: f64 = 50.0;

pub fn risk_multiplier(risk: RiskEstimate) -> f64 {
    1.0 + RISK_LOADING * risk.value()
}

pub fn value_factor(vehicle_value: f64) -> f64 {
    (vehicle_value / REFERENCE_VEHICLE_VALUE).clamp(VALUE_FACTOR_MIN, VALUE_FACTOR_MAX)
}

/// Price a validated profile at the given risk.
pub fn price(risk: RiskEstimate, profile: &ApplicantProfile) -> PremiumQuote {
    let prior_claims_fee = PRIOR_CLAIM_FEE * profile.prior_claims as f64;
    let base_premium = round_to(BASE_RATE * value_factor(profile.vehicle_value) + prior_claims_fee, 2);
    let final_premium = round_to(base_premium * risk_multiplier(risk), 2);
    PremiumQuote {
        base_premium,
        final_premium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::fixtures::profile;
    use proptest::prelude::*;

    fn at_value(vehicle_value: f64, prior_claims: i32) -> ApplicantProfile {
        ApplicantProfile {
            vehicle_value,
            prior_claims,
            ..profile()
        }
    }

    #[test]
    fn reference_vehicle_at_zero_risk() {
        let q = price(RiskEstimate::from_probability(0.0), &at_value(20_000.0, 0));
        assert_eq!(q.base_premium, 300.0);
        assert_eq!(q.final_premium, 300.0);
    }

    #[test]
    fn reference_vehicle_at_forty_percent_risk_doubles() {
        let q = price(RiskEstimate::from_probability(0.4), &at_value(20_000.0, 0));
        assert_eq!(q.base_premium, 300.0);
        assert_eq!(q.final_premium, 600.0);
    }

    #[test]
    fn prior_claims_add_flat_fee() {
        let q = price(RiskEstimate::from_probability(0.0), &at_value(20_000.0, 3));
        assert_eq!(q.base_premium, 450.0);
    }

    #[test]
    fn value_factor_is_clamped() {
        assert_eq!(value_factor(1.0), VALUE_FACTOR_MIN);
        assert_eq!(value_factor(5_000_000.0), VALUE_FACTOR_MAX);
        assert_eq!(value_factor(15_000.0), 0.75);

        let cheap = price(RiskEstimate::from_probability(0.0), &at_value(100.0, 0));
        assert_eq!(cheap.base_premium, 150.0);
        let exotic = price(RiskEstimate::from_probability(0.0), &at_value(1e9, 0));
        assert_eq!(exotic.base_premium, 600.0);
    }

    #[test]
    fn final_premium_is_rounded_to_cents() {
        let q = price(RiskEstimate::from_probability(0.1234), &at_value(15_000.0, 1));
        // base = 225 + 50 = 275; multiplier = 1.3085
        assert_eq!(q.base_premium, 275.0);
        assert_eq!(q.final_premium, 359.84);
    }

    proptest! {
        #[test]
        fn final_never_below_base(
            risk in 0.0f64..=1.0,
            vehicle_value in 0.01f64..10_000_000.0,
            prior_claims in 0i32..=10,
        ) {
            let q = price(RiskEstimate::from_probability(risk), &at_value(vehicle_value, prior_claims));
            prop_assert!(q.base_premium >= 0.0);
            prop_assert!(q.final_premium >= q.base_premium);
        }
    }
}

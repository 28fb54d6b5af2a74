//! Underwriting rule chains for quote time and bind time.
//!
//! Quote time (`pre_decision`), starting from `auto_approve`:
//! 1. risk > 0.6 → `reject`, "High risk score {risk}"
//! 2. 0.4 < risk ≤ 0.6 → `refer`, "Borderline risk score {risk}"
//! 3. credit score < 550 → `refer`, "Low credit score" (even after `reject`)
//!
//! Bind time (`final_decision`) restates the quote-time label in the bind
//! vocabulary (`auto_approve → approved`, `refer → referred`, `reject → rejected`)
//! and then applies the capacity rule: coverage above 2.5× the vehicle value is
//! `rejected` with "Coverage exceeds value threshold".

use crate::domain::{
    ApplicantProfile, DecisionOutcome, FinalDecision, PreDecision, PremiumQuote, RiskEstimate,
    UnderwriteApplication,
};
use crate::rules::{Rule, RuleContext, evaluate};

pub const REJECT_RISK: f64 = 0.6;
pub const REFER_RISK: f64 = 0.4;
pub const MIN_CREDIT_SCORE: i32 = 550;
pub const MAX_COVERAGE_TO_VALUE: f64 = 2.5;

pub const LOW_CREDIT_REASON: &str = "Low credit score";
pub const CAPACITY_REASON: &str = "Coverage exceeds value threshold";

const PRE_DECISION_RULES: [Rule<PreDecision>; 3] = [
    Rule {
        name: "high-risk",
        applies: |ctx| ctx.risk.value() > REJECT_RISK,
        label: PreDecision::Reject,
        reason: |ctx| format!("High risk score {}", ctx.risk),
    },
    Rule {
        name: "borderline-risk",
        applies: |ctx| ctx.risk.value() > REFER_RISK && ctx.risk.value() <= REJECT_RISK,
        label: PreDecision::Refer,
        reason: |ctx| format!("Borderline risk score {}", ctx.risk),
    },
    Rule {
        name: "low-credit",
        applies: |ctx| ctx.profile.credit_score < MIN_CREDIT_SCORE,
        label: PreDecision::Refer,
        reason: |_| LOW_CREDIT_REASON.to_string(),
    },
];

const FINAL_DECISION_RULES: [Rule<FinalDecision>; 1] = [Rule {
    name: "coverage-capacity",
    applies: |ctx| {
        ctx.requested_coverage
            .is_some_and(|c| c > MAX_COVERAGE_TO_VALUE * ctx.profile.vehicle_value)
    },
    label: FinalDecision::Rejected,
    reason: |_| CAPACITY_REASON.to_string(),
}];

impl PreDecision {
    /// The same judgement expressed in the bind-time vocabulary.
    pub fn to_final(self) -> FinalDecision {
        match self {
            PreDecision::AutoApprove => FinalDecision::Approved,
            PreDecision::Refer => FinalDecision::Referred,
            PreDecision::Reject => FinalDecision::Rejected,
        }
    }
}

/// Quote-time underwriting judgement.
pub fn pre_decision(
    risk: RiskEstimate,
    price: &PremiumQuote,
    profile: &ApplicantProfile,
) -> DecisionOutcome<PreDecision> {
    let ctx = RuleContext {
        risk,
        price,
        profile,
        requested_coverage: None,
    };
    evaluate(
        &PRE_DECISION_RULES,
        &ctx,
        DecisionOutcome {
            label: PreDecision::AutoApprove,
            reasons: Vec::new(),
        },
    )
}

/// Bind-time underwriting judgement, including the coverage-capacity check.
pub fn final_decision(
    risk: RiskEstimate,
    price: &PremiumQuote,
    application: &UnderwriteApplication,
) -> DecisionOutcome<FinalDecision> {
    let pre = pre_decision(risk, price, &application.profile);
    let ctx = RuleContext {
        risk,
        price,
        profile: &application.profile,
        requested_coverage: Some(application.requested_coverage),
    };
    evaluate(
        &FINAL_DECISION_RULES,
        &ctx,
        DecisionOutcome {
            label: pre.label.to_final(),
            reasons: pre.reasons,
        },
    )
}

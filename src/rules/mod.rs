//! Sequential-override rule chains.
//!
//! A chain is an ordered list of rules. Each rule whose predicate holds overwrites
//! the current label and appends its reason. Evaluation never stops early, so a
//! later rule can still change a label set by an earlier one, and every matching
//! rule leaves a reason behind (in evaluation order, duplicates kept).

use tracing::trace;

use crate::domain::{ApplicantProfile, DecisionOutcome, PremiumQuote, RiskEstimate};

pub mod underwriting;

pub use underwriting::*;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub risk: RiskEstimate,
    pub price: &'a PremiumQuote,
    pub profile: &'a ApplicantProfile,
    /// Only present at bind time.
    pub requested_coverage: Option<f64>,
}

/// One predicate → effect step.
pub struct Rule<L> {
    pub name: &'static str,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub label: L,
    pub reason: fn(&RuleContext<'_>) -> String,
}

/// Run `rules` in order, starting from `initial`.
pub fn evaluate<L: Copy + std::fmt::Debug>(
    rules: &[Rule<L>],
    ctx: &RuleContext<'_>,
    initial: DecisionOutcome<L>,
) -> DecisionOutcome<L> {
    let DecisionOutcome { mut label, mut reasons } = initial;
    for rule in rules {
        if (rule.applies)(ctx) {
            label = rule.label;
            reasons.push((rule.reason)(ctx));
            trace!(rule = rule.name, ?label, "rule matched");
        }
    }
    DecisionOutcome { label, reasons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::fixtures::profile;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Light {
        Green,
        Amber,
        Red,
    }

    #[test]
    fn later_rules_override_label_and_all_reasons_are_kept() {
        let rules = [
            Rule {
                name: "always-red",
                applies: |_| true,
                label: Light::Red,
                reason: |_| "red".to_string(),
            },
            Rule {
                name: "never",
                applies: |_| false,
                label: Light::Green,
                reason: |_| "unreachable".to_string(),
            },
            Rule {
                name: "amber-again",
                applies: |_| true,
                label: Light::Amber,
                reason: |_| "red".to_string(),
            },
        ];
        let p = profile();
        let price = PremiumQuote {
            base_premium: 1.0,
            final_premium: 1.0,
        };
        let ctx = RuleContext {
            risk: RiskEstimate::from_probability(0.1),
            price: &price,
            profile: &p,
            requested_coverage: None,
        };
        let out = evaluate(
            &rules,
            &ctx,
            DecisionOutcome {
                label: Light::Green,
                reasons: vec!["seed".to_string()],
            },
        );
        assert_eq!(out.label, Light::Amber);
        assert_eq!(out.reasons, vec!["seed", "red", "red"]);
    }
}

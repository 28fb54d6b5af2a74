//! Compliance side-checks run at quote time.
//!
//! Neither check changes the label or the numbers:
//! - the watch-list check only raises a flag (manual-review routing is not wired up)
//! - the fairness heuristic may append a review note after the underwriting reasons

use crate::domain::{ApplicantProfile, Gender, RiskEstimate};

/// Customer identifiers flagged as politically exposed persons.
pub const WATCH_LIST: [&str; 2] = ["pep_123", "pep_abc"];

pub const FAIRNESS_RISK_THRESHOLD: f64 = 0.5;
pub const FAIRNESS_NOTE: &str = "Fairness check: review female customer with high risk.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplianceReport {
    pub watch_listed: bool,
    pub notes: Vec<String>,
}

pub fn is_watch_listed(customer_id: &str) -> bool {
    WATCH_LIST.contains(&customer_id)
}

pub fn fairness_notes(risk: RiskEstimate, profile: &ApplicantProfile) -> Vec<String> {
    let mut notes = Vec::new();
    if profile.gender == Some(Gender::F) && risk.value() > FAIRNESS_RISK_THRESHOLD {
        notes.push(FAIRNESS_NOTE.to_string());
    }
    notes
}

pub fn review(risk: RiskEstimate, profile: &ApplicantProfile) -> ComplianceReport {
    ComplianceReport {
        watch_listed: is_watch_listed(&profile.customer_id),
        notes: fairness_notes(risk, profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::fixtures::profile;

    #[test]
    fn watch_list_is_exact_match() {
        assert!(is_watch_listed("pep_123"));
        assert!(is_watch_listed("pep_abc"));
        assert!(!is_watch_listed("PEP_123"));
        assert!(!is_watch_listed("c1"));
    }

    #[test]
    fn fairness_note_needs_female_and_risk_above_half() {
        let p = profile();
        assert_eq!(fairness_notes(RiskEstimate::from_probability(0.51), &p), vec![FAIRNESS_NOTE]);
        assert!(fairness_notes(RiskEstimate::from_probability(0.5), &p).is_empty());

        let male = ApplicantProfile {
            gender: Some(Gender::M),
            ..profile()
        };
        assert!(fairness_notes(RiskEstimate::from_probability(0.9), &male).is_empty());

        let unset = ApplicantProfile {
            gender: None,
            ..profile()
        };
        assert!(fairness_notes(RiskEstimate::from_probability(0.9), &unset).is_empty());
    }

    #[test]
    fn review_combines_both_checks() {
        let p = ApplicantProfile {
            customer_id: "pep_abc".to_string(),
            ..profile()
        };
        let report = review(RiskEstimate::from_probability(0.7), &p);
        assert!(report.watch_listed);
        assert_eq!(report.notes.len(), 1);
    }
}

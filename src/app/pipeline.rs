//! Decision pipeline shared by every front-end command.
//!
//! quote:      validate -> audit(received) -> score -> price -> pre-decision
//!             -> compliance -> audit(decided) -> feedback
//! underwrite: validate -> score -> price -> final decision -> feedback
//!
//! Audit and feedback writes are fire-and-forget: a failing sink is logged and
//! never changes or fails the decision.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::compliance;
use crate::domain::{ApplicantProfile, QuoteResult, UnderwriteApplication, UnderwriteResult};
use crate::error::{DecisionError, SinkError};
use crate::io::{AuditSink, FeedbackRecorder};
use crate::models::RiskScorer;
use crate::pricing;
use crate::rules::{final_decision, pre_decision};

pub const ORCHESTRATOR_ACTOR: &str = "orchestrator";

/// Orchestrates scoring, pricing, rules and compliance for one request at a time.
///
/// Holds no per-request state, so one pipeline can serve many threads.
#[derive(Clone)]
pub struct DecisionPipeline {
    scorer: Arc<RiskScorer>,
    sink: Arc<dyn AuditSink>,
    feedback: FeedbackRecorder,
}

impl DecisionPipeline {
    pub fn new(scorer: Arc<RiskScorer>, sink: Arc<dyn AuditSink>) -> Self {
        let feedback = FeedbackRecorder::new(Arc::clone(&sink));
        Self { scorer, sink, feedback }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn quote(&self, profile: &ApplicantProfile) -> Result<QuoteResult, DecisionError> {
        profile.validate()?;
        self.audit("quote_received", profile);

        let risk = self.scorer.score(profile);
        debug!(customer_id = %profile.customer_id, %risk, "risk scored");

        let price = pricing::price(risk, profile);
        debug!(base = price.base_premium, final_ = price.final_premium, "premium computed");

        let outcome = pre_decision(risk, &price, profile);
        let report = compliance::review(risk, profile);
        if report.watch_listed {
            warn!(customer_id = %profile.customer_id, "customer is on the watch list");
        }

        let mut reasons = outcome.reasons;
        reasons.extend(report.notes);

        let result = QuoteResult {
            probability_of_loss: risk.value(),
            base_premium: price.base_premium,
            final_premium: price.final_premium,
            decision: outcome.label,
            reasons,
        };

        self.audit("quote_decided", &result);
        self.record_feedback("quote", profile, &result);
        info!(
            customer_id = %profile.customer_id,
            decision = %result.decision,
            probability_of_loss = result.probability_of_loss,
            "quote decided"
        );
        Ok(result)
    }

    pub fn underwrite(&self, application: &UnderwriteApplication) -> Result<UnderwriteResult, DecisionError> {
        application.validate()?;
        let profile = &application.profile;

        let risk = self.scorer.score(profile);
        let price = pricing::price(risk, profile);
        debug!(customer_id = %profile.customer_id, %risk, final_ = price.final_premium, "application priced");

        let outcome = final_decision(risk, &price, application);
        let result = UnderwriteResult {
            decision: outcome.label,
            reasons: outcome.reasons,
        };

        self.record_feedback("underwrite", application, &result);
        info!(customer_id = %profile.customer_id, decision = %result.decision, "application underwritten");
        Ok(result)
    }

    /// Quote many profiles in parallel; results keep input order.
    pub fn quote_many(&self, profiles: &[ApplicantProfile]) -> Vec<Result<QuoteResult, DecisionError>> {
        profiles.par_iter().map(|p| self.quote(p)).collect()
    }

    /// Underwrite many applications in parallel; results keep input order.
    pub fn underwrite_many(
        &self,
        applications: &[UnderwriteApplication],
    ) -> Vec<Result<UnderwriteResult, DecisionError>> {
        applications.par_iter().map(|a| self.underwrite(a)).collect()
    }

    fn audit<T: Serialize>(&self, action: &str, payload: &T) {
        let written = serde_json::to_value(payload)
            .map_err(SinkError::from)
            .and_then(|value| self.sink.append(ORCHESTRATOR_ACTOR, action, value));
        if let Err(err) = written {
            warn!(action, error = %err, "audit write failed");
        }
    }

    fn record_feedback<I: Serialize, O: Serialize>(&self, kind: &str, inputs: &I, outputs: &O) {
        if let Err(err) = self.feedback.record(kind, inputs, outputs) {
            warn!(kind, error = %err, "feedback write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::FAIRNESS_NOTE;
    use crate::domain::types::fixtures::{application, profile};
    use crate::domain::{FinalDecision, Gender, PreDecision};
    use crate::io::audit::tests::BrokenSink;
    use crate::io::{FEEDBACK_ACTOR, MemoryAuditSink};
    use proptest::prelude::*;

    fn pipeline(p: f64) -> (DecisionPipeline, Arc<MemoryAuditSink>) {
        let sink = Arc::new(MemoryAuditSink::new());
        let scorer = Arc::new(RiskScorer::constant(p).unwrap());
        (DecisionPipeline::new(scorer, sink.clone()), sink)
    }

    #[test]
    fn quote_emits_received_decided_then_feedback() {
        let (pipe, sink) = pipeline(0.2);
        let result = pipe.quote(&profile()).unwrap();

        let events = sink.snapshot();
        let trail: Vec<(&str, &str)> = events.iter().map(|e| (e.actor.as_str(), e.action.as_str())).collect();
        assert_eq!(
            trail,
            vec![
                (ORCHESTRATOR_ACTOR, "quote_received"),
                (ORCHESTRATOR_ACTOR, "quote_decided"),
                (FEEDBACK_ACTOR, "quote_record"),
            ]
        );
        assert_eq!(events[0].payload["customer_id"], "c1");
        assert_eq!(events[1].payload["decision"], "auto_approve");
        assert_eq!(events[2].payload["outputs"], serde_json::to_value(&result).unwrap());
    }

    #[test]
    fn underwrite_records_feedback_only() {
        let (pipe, sink) = pipeline(0.2);
        pipe.underwrite(&application(10_000.0)).unwrap();

        let events = sink.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor, FEEDBACK_ACTOR);
        assert_eq!(events[0].action, "underwrite_record");
        assert_eq!(events[0].payload["inputs"]["requested_coverage"], 10_000.0);
    }

    #[test]
    fn underwrite_skips_the_fairness_note() {
        let (pipe, sink) = pipeline(0.65);
        let app = application(10_000.0);
        assert_eq!(app.profile.gender, Some(Gender::F));

        let result = pipe.underwrite(&app).unwrap();
        assert_eq!(result.decision, FinalDecision::Rejected);
        assert_eq!(result.reasons, vec!["High risk score 0.65"]);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn high_risk_quote_rejects_and_appends_fairness_note_last() {
        let (pipe, _) = pipeline(0.65);
        let result = pipe.quote(&profile()).unwrap();
        assert_eq!(result.probability_of_loss, 0.65);
        assert_eq!(result.decision, PreDecision::Reject);
        assert_eq!(result.reasons, vec!["High risk score 0.65", FAIRNESS_NOTE]);
    }

    #[test]
    fn fairness_note_is_gender_specific() {
        let (pipe, _) = pipeline(0.65);
        let male = ApplicantProfile {
            gender: Some(Gender::M),
            ..profile()
        };
        let result = pipe.quote(&male).unwrap();
        assert_eq!(result.reasons, vec!["High risk score 0.65"]);
    }

    #[test]
    fn watch_listed_customer_gets_the_same_decision() {
        let (pipe, _) = pipeline(0.2);
        let pep = ApplicantProfile {
            customer_id: "pep_123".to_string(),
            ..profile()
        };
        let flagged = pipe.quote(&pep).unwrap();
        let plain = pipe.quote(&profile()).unwrap();
        assert_eq!(flagged, plain);
    }

    #[test]
    fn invalid_profile_fails_before_any_event() {
        let (pipe, sink) = pipeline(0.2);
        let bad = ApplicantProfile {
            age: 12,
            ..profile()
        };
        let err = pipe.quote(&bad).unwrap_err();
        match err {
            DecisionError::Validation(v) => assert_eq!(v.field, "age"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(sink.is_empty());

        let mut app = application(10_000.0);
        app.requested_coverage = -1.0;
        assert!(matches!(pipe.underwrite(&app), Err(DecisionError::Validation(_))));
        assert!(sink.is_empty());
    }

    #[test]
    fn broken_sink_does_not_fail_decisions() {
        let pipe = DecisionPipeline::new(Arc::new(RiskScorer::constant(0.45).unwrap()), Arc::new(BrokenSink));
        let quote = pipe.quote(&profile()).unwrap();
        assert_eq!(quote.decision, PreDecision::Refer);

        let bound = pipe.underwrite(&application(10_000.0)).unwrap();
        assert_eq!(bound.decision, FinalDecision::Referred);
    }

    #[test]
    fn underwrite_capacity_breach_rejects() {
        let (pipe, _) = pipeline(0.1);
        let ok = pipe.underwrite(&application(37_500.0)).unwrap();
        assert_eq!(ok.decision, FinalDecision::Approved);
        assert!(ok.reasons.is_empty());

        let breach = pipe.underwrite(&application(37_500.01)).unwrap();
        assert_eq!(breach.decision, FinalDecision::Rejected);
    }

    #[test]
    fn batch_results_keep_input_order() {
        let (pipe, sink) = pipeline(0.2);
        let profiles: Vec<ApplicantProfile> = (0..40)
            .map(|i| ApplicantProfile {
                customer_id: format!("c{i}"),
                age: if i == 7 { 5 } else { 30 },
                ..profile()
            })
            .collect();

        let results = pipe.quote_many(&profiles);
        assert_eq!(results.len(), 40);
        assert!(results[7].is_err());
        assert!(results.iter().enumerate().all(|(i, r)| (i == 7) == r.is_err()));
        // three events per valid quote
        assert_eq!(sink.len(), 39 * 3);

        let apps: Vec<UnderwriteApplication> = (1..=10).map(|i| application(1_000.0 * i as f64)).collect();
        let bound = pipe.underwrite_many(&apps);
        assert!(bound.iter().all(|r| r.as_ref().is_ok_and(|u| u.decision == FinalDecision::Approved)));
    }

    proptest! {
        #[test]
        fn quoting_is_idempotent_and_premium_never_discounted(
            p in 0.01f64..0.99,
            age in 16i32..=100,
            vehicle_value in 1.0f64..200_000.0,
            prior_claims in 0i32..=10,
            credit_score in 300i32..=850,
        ) {
            let (pipe, _) = pipeline(p);
            let profile = ApplicantProfile {
                customer_id: "prop".into(),
                age,
                vehicle_value,
                prior_claims,
                credit_score,
                gender: None,
            };
            let a = pipe.quote(&profile).unwrap();
            let b = pipe.quote(&profile).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert!(a.final_premium >= a.base_premium);
            prop_assert!((0.0..=1.0).contains(&a.probability_of_loss));
        }
    }
}

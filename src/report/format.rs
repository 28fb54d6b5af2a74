//! Plain-text renderings of decisions, audit listings and the model summary.

use crate::domain::{ApplicantProfile, Customer, QuoteResult, UnderwriteApplication, UnderwriteResult};
use crate::io::AuditEvent;
use crate::models::{FEATURES, RiskScorer};

pub fn format_quote(profile: &ApplicantProfile, result: &QuoteResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Quote: {} ===\n", profile.customer_id));
    out.push_str(&format!("Probability of loss: {:.4}\n", result.probability_of_loss));
    out.push_str(&format!("Base premium:        {:.2}\n", result.base_premium));
    out.push_str(&format!("Final premium:       {:.2}\n", result.final_premium));
    out.push_str(&format!("Decision:            {}\n", result.decision));
    push_reasons(&mut out, &result.reasons);
    out
}

pub fn format_underwrite(application: &UnderwriteApplication, result: &UnderwriteResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Underwrite: {} ===\n", application.profile.customer_id));
    out.push_str(&format!("Requested coverage: {:.2}\n", application.requested_coverage));
    out.push_str(&format!("Decision:           {}\n", result.decision));
    push_reasons(&mut out, &result.reasons);
    out
}

pub fn format_customer(customer: &Customer) -> String {
    format!(
        "{} | {} | {} | {}",
        customer.customer_id,
        customer.name,
        customer.email,
        customer.phone.as_deref().unwrap_or("-")
    )
}

/// Audit events as a fixed-width table (payloads are shown compacted).
pub fn format_logs(events: &[AuditEvent]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:<20} {:<12} {:<18} payload\n", "id", "ts", "actor", "action"));
    out.push_str(&format!("{:-<6} {:-<20} {:-<12} {:-<18} {:-<7}\n", "", "", "", "", ""));
    for e in events {
        let line = format!(
            "{:>6} {:<20} {:<12} {:<18} {}",
            e.id,
            e.ts.format("%Y-%m-%d %H:%M:%S"),
            truncate(&e.actor, 12),
            truncate(&e.action, 18),
            truncate(&e.payload.to_string(), 80),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if events.is_empty() {
        out.push_str("(no events)\n");
    }
    out
}

pub fn format_model_summary(scorer: &RiskScorer) -> String {
    let mut out = String::new();
    out.push_str("=== Risk model (standardized logistic regression) ===\n");

    if let Some(d) = scorer.diagnostics() {
        out.push_str(&format!("Training: seed={} n={} positive_rate={:.3}\n", d.seed, d.samples, d.positive_rate));
        out.push_str(&format!(
            "Fit: iterations={} accuracy={:.3} log_loss={:.4}\n",
            d.iterations, d.training_accuracy, d.log_loss
        ));
    }

    let scaler = scorer.scaler();
    let coefficients = scorer.coefficients();
    out.push_str(&format!("\n{:<14} {:>12} {:>12} {:>12}\n", "feature", "mean", "scale", "weight"));
    out.push_str(&format!("{:-<14} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    out.push_str(&format!("{:<14} {:>12} {:>12} {:>12.6}\n", "(intercept)", "", "", coefficients[0]));
    for (i, name) in FEATURES.iter().enumerate() {
        out.push_str(&format!(
            "{:<14} {:>12.3} {:>12.3} {:>12.6}\n",
            name, scaler.mean[i], scaler.scale[i], coefficients[i + 1]
        ));
    }
    out
}

fn push_reasons(out: &mut String, reasons: &[String]) {
    if reasons.is_empty() {
        out.push_str("Reasons:             (none)\n");
        return;
    }
    out.push_str("Reasons:\n");
    for r in reasons {
        out.push_str(&format!("- {r}\n"));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::fixtures::{application, profile};
    use crate::domain::{FinalDecision, PreDecision};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn quote_report_lists_reasons_in_order() {
        let result = QuoteResult {
            probability_of_loss: 0.65,
            base_premium: 225.0,
            final_premium: 590.63,
            decision: PreDecision::Reject,
            reasons: vec!["High risk score 0.65".into(), "second".into()],
        };
        let text = format_quote(&profile(), &result);
        assert!(text.contains("Decision:            reject"));
        assert!(text.contains("Final premium:       590.63"));
        let first = text.find("High risk").unwrap();
        let second = text.find("- second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn underwrite_report_marks_empty_reasons() {
        let result = UnderwriteResult {
            decision: FinalDecision::Approved,
            reasons: vec![],
        };
        let text = format_underwrite(&application(10_000.0), &result);
        assert!(text.contains("approved"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn logs_table_has_one_row_per_event() {
        let events = vec![AuditEvent {
            id: 3,
            ts: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            actor: "orchestrator".into(),
            action: "quote_decided".into(),
            payload: json!({ "decision": "refer" }),
        }];
        let text = format_logs(&events);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("2025-01-02 03:04:05"));
        assert!(format_logs(&[]).contains("(no events)"));
    }

    #[test]
    fn model_summary_lists_every_feature() {
        let scorer = RiskScorer::constant(0.3).unwrap();
        let text = format_model_summary(&scorer);
        for name in FEATURES {
            assert!(text.contains(name));
        }
        assert!(text.contains("(intercept)"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd.");
    }
}

//! Learning-feedback records: every decision's inputs and outputs, written to the
//! audit sink under the `feedback` actor.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::error::SinkError;
use crate::io::audit::{AuditEvent, AuditSink};

pub const FEEDBACK_ACTOR: &str = "feedback";

#[derive(Clone)]
pub struct FeedbackRecorder {
    sink: Arc<dyn AuditSink>,
}

impl FeedbackRecorder {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append a `{kind}_record` event with `{ inputs, outputs }` as payload.
    pub fn record<I: Serialize, O: Serialize>(
        &self,
        kind: &str,
        inputs: &I,
        outputs: &O,
    ) -> Result<AuditEvent, SinkError> {
        let payload = json!({
            "inputs": serde_json::to_value(inputs)?,
            "outputs": serde_json::to_value(outputs)?,
        });
        self.sink.append(FEEDBACK_ACTOR, &format!("{kind}_record"), payload)
    }
}

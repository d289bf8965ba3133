//! Flow Event Logger
//!
//! Conversation milestones emitted as structured events under the
//! `flow_events` target, so they land in the NDJSON file as one line each.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::{mask_sender, redact_sensitive_data};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum FlowEvent {
    SessionStarted,
    FlowSelected { flow: String },
    FlowCompleted { flow: String },
    FlowFailed { flow: String, kind: String, error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct FlowEventEntry {
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    pub event: FlowEvent,
}

impl FlowEventEntry {
    /// Build a log entry with the sender masked and error text scrubbed.
    pub fn new(sender: &str, mut event: FlowEvent) -> Self {
        if let FlowEvent::FlowFailed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        Self {
            sender: mask_sender(sender),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct FlowEventLogger;

impl FlowEventLogger {
    pub fn log(sender: &str, event: FlowEvent) {
        let entry = FlowEventEntry::new(sender, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "flow_events", event = %json, "Flow event");
    }
}

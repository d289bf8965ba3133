//! Structured logging for the wardrobe bot.
//!
//! Console + rolling NDJSON output, redaction of sender numbers and secrets,
//! and a structured logger for conversation flow events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{FlowEvent, FlowEventEntry, FlowEventLogger};
pub use logger::{LOG_FILE_PREFIX, init_logger};
pub use redact::{mask_sender, redact_sensitive_data};

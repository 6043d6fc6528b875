//! Trace error types for algoviz-core.
//!
//! Uses `thiserror` for structured, matchable variants. These errors never
//! escape the parser as `Err`; they travel inside
//! [`ParsedTrace::Invalid`](crate::parse::ParsedTrace::Invalid) so callers can
//! show a notice and keep the player in its no-trace state.

use thiserror::Error;

/// Reasons a trace payload could not be turned into a [`Trace`](crate::Trace).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The payload is not JSON, is not an array, or a step does not fit the
    /// step schema.
    #[error("malformed trace: {reason}")]
    MalformedTrace { reason: String },

    /// The payload parsed but contained no steps.
    #[error("trace contains no steps")]
    EmptyTrace,
}

impl TraceError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TraceError::MalformedTrace {
            reason: reason.into(),
        }
    }

    /// Machine-readable code used in API payloads and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            TraceError::MalformedTrace { .. } => "MALFORMED_TRACE",
            TraceError::EmptyTrace => "EMPTY_TRACE",
        }
    }
}

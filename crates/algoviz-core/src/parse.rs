//! Total parser for model-produced trace payloads.
//!
//! [`parse_trace`] never panics and never returns `Err`: every failure is a
//! [`ParsedTrace::Invalid`] value, logged once here. Only the top-level shape
//! and the first step are checked; every step is then decoded leniently by
//! [`Step::from_json`].

use serde_json::Value;

use crate::error::TraceError;
use crate::step::Step;
use crate::trace::Trace;

/// Outcome of parsing a trace payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTrace {
    Valid(Trace),
    Invalid(TraceError),
}

impl ParsedTrace {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedTrace::Valid(_))
    }

    pub fn into_trace(self) -> Option<Trace> {
        match self {
            ParsedTrace::Valid(trace) => Some(trace),
            ParsedTrace::Invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TraceError> {
        match self {
            ParsedTrace::Valid(_) => None,
            ParsedTrace::Invalid(err) => Some(err),
        }
    }
}

/// Removes one surrounding Markdown code fence (```` ```json ... ``` ````).
///
/// Text without a leading fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses raw text purported to be a JSON array of steps.
pub fn parse_trace(text: &str) -> ParsedTrace {
    match parse_inner(text) {
        Ok(trace) => {
            if let Some(position) = trace.first_index_anomaly() {
                tracing::warn!(
                    position,
                    steps = trace.len(),
                    "trace step numbers are not strictly increasing; keeping array order"
                );
            }
            tracing::debug!(steps = trace.len(), "trace accepted");
            ParsedTrace::Valid(trace)
        }
        Err(err) => {
            tracing::warn!(code = err.code(), "trace rejected: {}", err);
            ParsedTrace::Invalid(err)
        }
    }
}

/// Parses an already-decoded JSON value with the same rules as [`parse_trace`].
pub fn parse_trace_value(value: Value) -> ParsedTrace {
    match trace_from_value(value) {
        Ok(trace) => ParsedTrace::Valid(trace),
        Err(err) => {
            tracing::warn!(code = err.code(), "trace rejected: {}", err);
            ParsedTrace::Invalid(err)
        }
    }
}

fn parse_inner(text: &str) -> Result<Trace, TraceError> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body)
        .map_err(|err| TraceError::malformed(format!("not valid JSON: {}", err)))?;
    trace_from_value(value)
}

fn trace_from_value(value: Value) -> Result<Trace, TraceError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(TraceError::malformed(format!(
                "expected a JSON array of steps, found {}",
                json_kind(&other)
            )))
        }
    };
    let Some(first) = items.first() else {
        return Err(TraceError::EmptyTrace);
    };
    sniff_first_step(first)?;

    let steps: Vec<Step> = items
        .iter()
        .enumerate()
        .map(|(position, item)| Step::from_json(item, position))
        .collect();
    Trace::new(steps)
}

fn sniff_first_step(first: &Value) -> Result<(), TraceError> {
    let Value::Object(fields) = first else {
        return Err(TraceError::malformed(format!(
            "first step must be an object, found {}",
            json_kind(first)
        )));
    };
    if fields.contains_key("step") || fields.contains_key("index") {
        Ok(())
    } else {
        Err(TraceError::malformed("first step has no `step` or `index` field"))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::ScalarValue;

    const TWO_SUM: &str = r#"[
        {"index": 1, "description": "init", "arrayState": [2, 7, 11, 15],
         "pointers": {"i": 0}, "highlightedIndices": [0]},
        {"index": 2, "description": "match", "arrayState": [2, 7, 11, 15],
         "pointers": {"i": 1}, "highlightedIndices": [1]}
    ]"#;

    #[test]
    fn accepts_valid_trace() {
        let trace = parse_trace(TWO_SUM).into_trace().expect("valid trace");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[1].description, "match");
        assert_eq!(trace.steps()[0].array_state[3], ScalarValue::Int(15));
    }

    #[test]
    fn malformed_inputs_yield_invalid() {
        for input in ["not json", "{}", "42", "\"[]\"", "[1, 2]", "[{\"description\": \"x\"}]"] {
            match parse_trace(input) {
                ParsedTrace::Invalid(TraceError::MalformedTrace { .. }) => {}
                other => panic!("expected malformed for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn empty_array_is_empty_trace() {
        assert_eq!(parse_trace("[]"), ParsedTrace::Invalid(TraceError::EmptyTrace));
        assert_eq!(parse_trace("  [ ]  "), ParsedTrace::Invalid(TraceError::EmptyTrace));
    }

    #[test]
    fn only_the_first_step_is_sniffed() {
        let cases = [
            r#"[{"step": 1, "data": [1]}, {"description": "no number", "data": [2]}]"#,
            r#"[{"step": 1, "data": [1], "pointers": null}]"#,
            r#"[{"step": 1, "data": [1], "highlight": null}]"#,
            r#"[{"step": 1.0, "data": [1]}]"#,
            r#"[{"step": 1, "data": [[1, 2], [3]]}]"#,
            r#"[{"step": 1, "index": 1, "data": [1]}]"#,
            r#"[{"step": 1, "data": [1], "pointers": {"i": "zero"}}, 7]"#,
        ];
        for input in cases {
            assert!(parse_trace(input).is_valid(), "expected valid: {}", input);
        }
    }

    #[test]
    fn lenient_steps_keep_their_position() {
        let trace = parse_trace(
            r#"[{"step": 1, "data": [1, 2], "pointers": {"i": 0}},
                {"description": "second", "data": [2, 1], "pointers": {"i": 1.0, "j": "x"}}]"#,
        )
        .into_trace()
        .unwrap();
        let second = &trace.steps()[1];
        assert_eq!(second.index, 2);
        assert_eq!(second.pointers.len(), 1);
        assert_eq!(second.pointers.get("i"), Some(&1));
        assert_eq!(trace.first_index_anomaly(), None);
    }

    #[test]
    fn fenced_payload_is_accepted() {
        let fenced = format!("```json\n{}\n```", TWO_SUM);
        assert!(parse_trace(&fenced).is_valid());
        let bare_fence = format!("```\n{}\n```", TWO_SUM);
        assert!(parse_trace(&bare_fence).is_valid());
    }

    #[test]
    fn strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
    }

    #[test]
    fn non_increasing_indices_are_still_valid() {
        let parsed = parse_trace(r#"[{"step": 2}, {"step": 1}]"#);
        let trace = parsed.into_trace().unwrap();
        assert_eq!(trace.first_index_anomaly(), Some(1));
        assert_eq!(trace.steps()[0].index, 2);
    }

    #[test]
    fn parse_trace_value_matches_text_rules() {
        let value: Value = serde_json::from_str(TWO_SUM).unwrap();
        assert!(parse_trace_value(value).is_valid());
        assert_eq!(
            parse_trace_value(Value::Array(Vec::new())),
            ParsedTrace::Invalid(TraceError::EmptyTrace)
        );
    }
}

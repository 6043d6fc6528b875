//! Trace production: solution code and a user input in, an animation payload
//! and the algorithm's final output out.
//!
//! This stage never returns `Err`. Transport and envelope problems become
//! [`TraceResponse::Failure`]; the animation text itself is left for
//! [`algoviz_core::parse_trace`] to judge.

use serde::Deserialize;
use serde_json::Value;

use crate::llm_provider::{ChatOptions, ModelClient};
use crate::model_json::{decode_reply, value_to_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceResponse {
    Produced {
        animation_text: String,
        final_output: String,
    },
    Failure {
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct TraceEnvelope {
    #[serde(alias = "visualizationData", alias = "steps")]
    animation: Value,
    #[serde(default, alias = "finalOutput", alias = "final_output")]
    output: Value,
}

pub async fn produce_trace(
    client: &dyn ModelClient,
    solution_code: &str,
    user_input: &str,
) -> TraceResponse {
    let prompt = build_trace_prompt(solution_code, user_input);
    match client.complete_json(&prompt, ChatOptions::default()).await {
        Ok(raw) => evaluate_trace_reply(&raw),
        Err(err) => {
            tracing::warn!("trace production failed: {}", err);
            TraceResponse::Failure {
                reason: format!("Could not generate visualization from the AI model: {}", err),
            }
        }
    }
}

/// Splits a model reply into animation text and final output.
pub fn evaluate_trace_reply(raw: &str) -> TraceResponse {
    let envelope: TraceEnvelope = match decode_reply(raw, "visualization") {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("trace envelope rejected: {}", err);
            return TraceResponse::Failure {
                reason: err.to_string(),
            };
        }
    };
    let animation_text = match envelope.animation {
        Value::String(text) => text,
        other => other.to_string(),
    };
    TraceResponse::Produced {
        animation_text,
        final_output: value_to_text(&envelope.output),
    }
}

fn build_trace_prompt(solution_code: &str, user_input: &str) -> String {
    format!(
        "You are an expert algorithm visualizer.\n\
Return only JSON with no markdown and no surrounding text.\n\
Trace the solution code below on the given input, step by step, and return an object with:\n\
- animation: array of step objects, in execution order, each with\n\
  - step: 1-based integer, strictly increasing\n\
  - description: short text of what happens at this step\n\
  - data: array of numbers or strings, the primary data structure at this step\n\
  - pointers: object mapping variable names to integer indices into data\n\
  - highlight: array of integer indices into data to emphasize (optional)\n\
- output: the value the algorithm returns for this input\n\
\n\
Example:\n\
{{\"animation\": [{{\"step\": 1, \"description\": \"Initialize i=0, j=5\", \"data\": [1,8,6,2,5,4], \
\"pointers\": {{\"i\": 0, \"j\": 5}}, \"highlight\": [0, 5]}}], \"output\": \"8\"}}\n\
\n\
Solution Code:\n{}\n\
\n\
Input: {}",
        solution_code, user_input
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::parse_trace;

    #[test]
    fn array_animation_is_reserialized_for_the_parser() {
        let response = evaluate_trace_reply(
            r#"{"animation": [{"step": 1, "description": "init", "data": [1, 2]}], "output": 3}"#,
        );
        match response {
            TraceResponse::Produced {
                animation_text,
                final_output,
            } => {
                assert!(parse_trace(&animation_text).is_valid());
                assert_eq!(final_output, "3");
            }
            TraceResponse::Failure { reason } => panic!("unexpected failure: {}", reason),
        }
    }

    #[test]
    fn string_animation_is_passed_through() {
        let response = evaluate_trace_reply(
            r#"{"visualizationData": "[{\"step\": 1}]", "finalOutput": "[0, 1]"}"#,
        );
        assert_eq!(
            response,
            TraceResponse::Produced {
                animation_text: r#"[{"step": 1}]"#.to_string(),
                final_output: "[0, 1]".to_string(),
            }
        );
    }

    #[test]
    fn malformed_animation_still_counts_as_produced() {
        let response = evaluate_trace_reply(r#"{"animation": "not json"}"#);
        match response {
            TraceResponse::Produced {
                animation_text,
                final_output,
            } => {
                assert!(!parse_trace(&animation_text).is_valid());
                assert!(final_output.is_empty());
            }
            TraceResponse::Failure { .. } => panic!("envelope was valid"),
        }
    }

    #[test]
    fn unreadable_envelope_is_failure() {
        assert!(matches!(
            evaluate_trace_reply("I cannot do that"),
            TraceResponse::Failure { .. }
        ));
        assert!(matches!(
            evaluate_trace_reply(r#"{"output": 1}"#),
            TraceResponse::Failure { .. }
        ));
    }

    #[test]
    fn prompt_carries_code_and_input() {
        let prompt = build_trace_prompt("def f(): pass", "nums = [1]");
        assert!(prompt.contains("def f(): pass"));
        assert!(prompt.contains("Input: nums = [1]"));
        assert!(prompt.contains("\"pointers\": {\"i\": 0, \"j\": 5}"));
    }
}

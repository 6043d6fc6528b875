//! Problem analysis: problem number in, statement and metadata out.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::llm_provider::{ChatOptions, ModelClient};
use crate::model_json::{decode_reply, lenient_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

/// Statement and metadata of one practice problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(alias = "problemName")]
    pub problem_name: String,
    /// Primary data-structures-and-algorithms topic (e.g. "Two Pointers").
    #[serde(alias = "dsaTopic")]
    pub dsa_topic: String,
    #[serde(alias = "difficultyLevel")]
    pub difficulty_level: Difficulty,
    #[serde(alias = "problemStatement", default, deserialize_with = "lenient_text")]
    pub problem_statement: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub constraints: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub examples: String,
}

/// Asks the model for the details of problem `problem_number`.
pub async fn analyze_problem(
    client: &dyn ModelClient,
    problem_number: u32,
) -> Result<ProblemDetails, ApiError> {
    let prompt = build_problem_prompt(problem_number);
    let raw = client.complete_json(&prompt, ChatOptions::default()).await?;
    evaluate_problem_json_text(&raw, problem_number)
}

/// Decodes and checks a problem-analysis reply.
pub fn evaluate_problem_json_text(
    raw: &str,
    problem_number: u32,
) -> Result<ProblemDetails, ApiError> {
    let details: ProblemDetails = decode_reply(raw, "problem analysis")?;
    if details.problem_statement.trim().is_empty() {
        return Err(ApiError::NotFound(format!(
            "Could not find details for problem #{}. Please check the number and try again.",
            problem_number
        )));
    }
    Ok(details)
}

fn build_problem_prompt(problem_number: u32) -> String {
    format!(
        "You are a LeetCode problem expert.\n\
Return only JSON with no markdown and no surrounding text.\n\
Given a LeetCode problem number, return an object with these keys:\n\
- problem_name (string)\n\
- dsa_topic (string, the primary topic, e.g. \"Arrays\", \"Dynamic Programming\", \"Graphs\")\n\
- difficulty_level (one of \"Easy\", \"Medium\", \"Hard\")\n\
- problem_statement (string)\n\
- constraints (string)\n\
- examples (string)\n\
If you do not know the problem, return an empty problem_statement.\n\
\n\
Problem Number: {}",
        problem_number
    )
}

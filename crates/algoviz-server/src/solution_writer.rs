//! Solution generation: code in five languages, explanation, hints, related
//! problems and a default visualization input.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::llm_provider::{ChatOptions, ModelClient};
use crate::model_json::{decode_reply, lenient_text};
use crate::problem_analyzer::ProblemDetails;

const SOLUTION_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCodes {
    #[serde(default)]
    pub python: String,
    #[serde(default)]
    pub javascript: String,
    #[serde(default)]
    pub java: String,
    #[serde(default)]
    pub c: String,
    #[serde(default)]
    pub cpp: String,
}

impl SolutionCodes {
    /// Code used for trace production: Python first, then C++, C and
    /// JavaScript.
    pub fn visualization_source(&self) -> Option<&str> {
        [&self.python, &self.cpp, &self.c, &self.javascript]
            .into_iter()
            .map(String::as_str)
            .find(|code| !code.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarProblem {
    #[serde(alias = "problemNumber")]
    pub problem_number: u32,
    #[serde(alias = "problemName")]
    pub problem_name: String,
    #[serde(alias = "problemStatement", default)]
    pub problem_statement: String,
    #[serde(alias = "dsaTopic", default)]
    pub dsa_topic: String,
    /// How this problem relates to the original one.
    #[serde(default)]
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSet {
    #[serde(alias = "solutionCodes")]
    pub solution_codes: SolutionCodes,
    /// Markdown, language-agnostic.
    #[serde(alias = "solutionExplanation", deserialize_with = "lenient_text")]
    pub solution_explanation: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(alias = "similarProblems", default)]
    pub similar_problems: Vec<SimilarProblem>,
    /// A valid example input, e.g. `height = [1,8,6,2,5,4,8,3,7]`.
    #[serde(alias = "defaultInput", default, deserialize_with = "lenient_text")]
    pub default_input: String,
}

pub async fn generate_solution(
    client: &dyn ModelClient,
    problem: &ProblemDetails,
) -> Result<SolutionSet, ApiError> {
    let prompt = build_solution_prompt(problem);
    let options = ChatOptions {
        temperature: Some(SOLUTION_TEMPERATURE),
    };
    let raw = client.complete_json(&prompt, options).await?;
    evaluate_solution_json_text(&raw)
}

/// Decodes a solution reply; at least one language must carry code.
pub fn evaluate_solution_json_text(raw: &str) -> Result<SolutionSet, ApiError> {
    let solution: SolutionSet = decode_reply(raw, "solution")?;
    if solution.solution_codes.visualization_source().is_none()
        && solution.solution_codes.java.trim().is_empty()
    {
        return Err(ApiError::UpstreamFailure(
            "Failed to generate a complete solution: the reply contained no code.".to_string(),
        ));
    }
    Ok(solution)
}

fn build_solution_prompt(problem: &ProblemDetails) -> String {
    format!(
        "You are a LeetCode expert and a world-class software engineer.\n\
Return only JSON with no markdown and no surrounding text.\n\
Given the problem below, return an object with these keys:\n\
- solution_codes: object with optimal solutions as strings under python, javascript, java, c, cpp\n\
- solution_explanation: one language-agnostic, step-by-step explanation in markdown\n\
- hints: array of exactly 3 concise, helpful hints\n\
- similar_problems: array of all relevant similar problems, each with problem_number, \
problem_name, problem_statement, dsa_topic and relationship (how it relates to this problem)\n\
- default_input: one valid input as a string, e.g. \"height = [1,8,6,2,5,4,8,3,7]\"\n\
\n\
Problem Statement: {}\n\
Constraints: {}\n\
Examples: {}",
        problem.problem_statement, problem.constraints, problem.examples
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem_analyzer::Difficulty;

    const REPLY: &str = r#"{
        "solution_codes": {
            "python": "def two_sum(nums, target): ...",
            "javascript": "function twoSum() {}",
            "java": "class Solution {}",
            "c": "",
            "cpp": "vector<int> twoSum() {}"
        },
        "solution_explanation": "Use a hash map.",
        "hints": ["Think complements", "Use a map", "One pass"],
        "similarProblems": [{
            "problemNumber": 167,
            "problemName": "Two Sum II",
            "problemStatement": "Sorted input.",
            "dsaTopic": "Two Pointers",
            "relationship": "Same goal on sorted input."
        }],
        "default_input": "nums = [2,7,11,15], target = 9"
    }"#;

    #[test]
    fn decodes_full_reply() {
        let solution = evaluate_solution_json_text(REPLY).unwrap();
        assert_eq!(solution.hints.len(), 3);
        assert_eq!(solution.similar_problems[0].problem_number, 167);
        assert_eq!(solution.default_input, "nums = [2,7,11,15], target = 9");
        assert_eq!(
            solution.solution_codes.visualization_source(),
            Some("def two_sum(nums, target): ...")
        );
    }

    #[test]
    fn visualization_source_fallback_order() {
        let codes = SolutionCodes {
            python: "  ".to_string(),
            javascript: "js".to_string(),
            java: "java".to_string(),
            c: "c".to_string(),
            cpp: String::new(),
        };
        assert_eq!(codes.visualization_source(), Some("c"));

        let codes = SolutionCodes {
            java: "java only".to_string(),
            ..SolutionCodes::default()
        };
        assert_eq!(codes.visualization_source(), None);
    }

    #[test]
    fn reply_without_code_is_rejected() {
        let err = evaluate_solution_json_text(
            r#"{"solution_codes": {}, "solution_explanation": "none"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::UpstreamFailure(_)));
    }

    #[test]
    fn prompt_embeds_problem() {
        let problem = ProblemDetails {
            problem_name: "Two Sum".to_string(),
            dsa_topic: "Hash Table".to_string(),
            difficulty_level: Difficulty::Easy,
            problem_statement: "Find indices".to_string(),
            constraints: "n >= 2".to_string(),
            examples: "[2,7] -> [0,1]".to_string(),
        };
        let prompt = build_solution_prompt(&problem);
        assert!(prompt.contains("Problem Statement: Find indices"));
        assert!(prompt.contains("Constraints: n >= 2"));
        assert!(prompt.contains("exactly 3"));
    }
}

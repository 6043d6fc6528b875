//! Problem analysis request/response types.

use serde::{Deserialize, Serialize};

use crate::problem_analyzer::ProblemDetails;
use crate::solution_writer::SolutionSet;

/// Request to analyze a practice problem by number.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeProblemRequest {
    pub problem_number: i64,
}

/// Problem details and generated solution, merged into one object.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeProblemResponse {
    pub success: bool,
    pub problem_number: u32,
    #[serde(flatten)]
    pub problem: ProblemDetails,
    #[serde(flatten)]
    pub solution: SolutionSet,
    /// External interactive visualization for the problem's topic.
    pub visualization_url: String,
}

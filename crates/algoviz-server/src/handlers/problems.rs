//! Problem analysis handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::problem_analyzer::analyze_problem;
use crate::schema::problems::{AnalyzeProblemRequest, AnalyzeProblemResponse};
use crate::solution_writer::generate_solution;
use crate::state::AppState;
use crate::topic_map::visualization_url;

/// Fetches the problem details, then generates the solution set.
///
/// `POST /problems/analyze`
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeProblemRequest>,
) -> Result<Json<AnalyzeProblemResponse>, ApiError> {
    let problem_number = u32::try_from(req.problem_number)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "invalid problem number {}: expected a positive integer",
                req.problem_number
            ))
        })?;

    tracing::info!(problem_number, "analyzing problem");
    let problem = analyze_problem(state.model.as_ref(), problem_number).await?;
    let solution = generate_solution(state.model.as_ref(), &problem).await?;
    let visualization_url = visualization_url(&problem.dsa_topic);

    Ok(Json(AnalyzeProblemResponse {
        success: true,
        problem_number,
        problem,
        solution,
        visualization_url,
    }))
}

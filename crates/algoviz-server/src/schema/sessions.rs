//! Player session request/response types.
//!
//! Every response carries the rendered [`Frame`] of the session's player, so
//! the client never computes playback state itself.

use algoviz_core::{Frame, TickOutcome, TraceError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::solution_writer::SolutionCodes;

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub frame: Frame,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameResponse {
    pub frame: Frame,
}

/// Request to visualize a solution on a user input.
///
/// Either `solution_codes` (the generated set; Python, C++, C, JavaScript are
/// tried in that order) or a single `solution_code` must be supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct VisualizeRequest {
    #[serde(default)]
    pub solution_codes: Option<SolutionCodes>,
    #[serde(default)]
    pub solution_code: Option<String>,
    pub user_input: String,
}

/// Inline notice shown in place of the animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: String,
    pub message: String,
}

impl From<&TraceError> for Notice {
    fn from(err: &TraceError) -> Self {
        Notice {
            code: err.code().to_string(),
            message: format!("Could not load animation: {}", err),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizeResponse {
    pub success: bool,
    pub frame: Frame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JumpRequest {
    pub index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickRequest {
    /// Player generation the client's timer was started against.
    pub generation: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickResponse {
    pub outcome: TickOutcome,
    pub frame: Frame,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeedRequest {
    /// 0 (fast) to 100 (slow); out-of-range values are clamped.
    pub speed: i64,
}

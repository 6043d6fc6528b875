//! Player session handlers: lifecycle, visualization requests and playback.

use algoviz_core::parse_trace;
use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::schema::sessions::{
    CreateSessionResponse, FrameResponse, JumpRequest, ListSessionsResponse, Notice,
    SpeedRequest, TickRequest, TickResponse, VisualizeRequest, VisualizeResponse,
};
use crate::session::{Delivery, PlayerSession, SessionId};
use crate::state::AppState;
use crate::trace_producer::{produce_trace, TraceResponse};

/// `POST /sessions`
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let (id, frame) = state.sessions.create();
    Ok(Json(CreateSessionResponse {
        session_id: id.0,
        frame,
    }))
}

/// `GET /sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ListSessionsResponse>, ApiError> {
    let mut sessions: Vec<Uuid> = state.sessions.ids().into_iter().map(|id| id.0).collect();
    sessions.sort();
    Ok(Json(ListSessionsResponse { sessions }))
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FrameResponse>, ApiError> {
    let frame = transition(&state, &session_id, |session| session.frame())?;
    Ok(Json(FrameResponse { frame }))
}

/// `DELETE /sessions/{id}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_session_id(&session_id)?;
    if !state.sessions.remove(&id) {
        return Err(ApiError::NotFound(format!("session {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Produces a new trace for the session and loads it, replacing the old one.
///
/// `POST /sessions/{id}/visualize`
pub async fn visualize(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<VisualizeRequest>,
) -> Result<Json<VisualizeResponse>, ApiError> {
    let id = parse_session_id(&session_id)?;
    let user_input = req.user_input.trim();
    if user_input.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide an input to visualize.".to_string(),
        ));
    }
    let solution_code = select_solution_code(&req)?;

    let pending = state
        .sessions
        .begin_load(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))?;

    let (animation_text, final_output) =
        match produce_trace(state.model.as_ref(), &solution_code, user_input).await {
            TraceResponse::Produced {
                animation_text,
                final_output,
            } => (animation_text, final_output),
            TraceResponse::Failure { reason } => {
                return Err(ApiError::UpstreamFailure(reason));
            }
        };

    match state
        .sessions
        .finish_load(pending, parse_trace(&animation_text), Some(final_output))
    {
        Delivery::Loaded(frame) => Ok(Json(VisualizeResponse {
            success: true,
            frame,
            notice: None,
        })),
        Delivery::Rejected { frame, error } => Ok(Json(VisualizeResponse {
            success: true,
            frame,
            notice: Some(Notice::from(&error)),
        })),
        Delivery::Superseded => Err(ApiError::Conflict(
            "a newer visualization request replaced this one".to_string(),
        )),
    }
}

/// `POST /sessions/{id}/next`
pub async fn next(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FrameResponse>, ApiError> {
    navigate(&state, &session_id, |session| session.player.next())
}

/// `POST /sessions/{id}/previous`
pub async fn previous(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FrameResponse>, ApiError> {
    navigate(&state, &session_id, |session| session.player.previous())
}

/// `POST /sessions/{id}/reset`
pub async fn reset(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FrameResponse>, ApiError> {
    navigate(&state, &session_id, |session| session.player.reset())
}

/// `POST /sessions/{id}/jump`
pub async fn jump(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<FrameResponse>, ApiError> {
    navigate(&state, &session_id, |session| session.player.jump_to(req.index))
}

/// Toggles auto-play.
///
/// `POST /sessions/{id}/play`
pub async fn toggle_play(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<FrameResponse>, ApiError> {
    let frame = transition(&state, &session_id, |session| {
        session.autoplay.toggle(&mut session.player);
        session.frame()
    })?;
    Ok(Json(FrameResponse { frame }))
}

/// One auto-play timer tick from the client.
///
/// `POST /sessions/{id}/tick`
pub async fn tick(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<TickRequest>,
) -> Result<Json<TickResponse>, ApiError> {
    let (outcome, frame) = transition(&state, &session_id, |session| {
        let outcome = session.autoplay.tick(&mut session.player, req.generation);
        (outcome, session.frame())
    })?;
    Ok(Json(TickResponse { outcome, frame }))
}

/// `POST /sessions/{id}/speed`
pub async fn set_speed(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<FrameResponse>, ApiError> {
    let speed = u8::try_from(req.speed.clamp(0, 100)).unwrap_or(u8::MAX);
    let frame = transition(&state, &session_id, |session| {
        session.autoplay.set_speed(speed);
        session.frame()
    })?;
    Ok(Json(FrameResponse { frame }))
}

/// Manual navigation: stops auto-play, then applies `step`.
fn navigate(
    state: &AppState,
    session_id: &str,
    step: impl FnOnce(&mut PlayerSession),
) -> Result<Json<FrameResponse>, ApiError> {
    let frame = transition(state, session_id, |session| {
        session.autoplay.cancel();
        step(session);
        session.frame()
    })?;
    Ok(Json(FrameResponse { frame }))
}

fn transition<R>(
    state: &AppState,
    session_id: &str,
    f: impl FnOnce(&mut PlayerSession) -> R,
) -> Result<R, ApiError> {
    let id = parse_session_id(session_id)?;
    state
        .sessions
        .with_session(&id, f)
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(raw).map(SessionId).map_err(|_| {
        ApiError::BadRequest(format!("invalid session id '{}': expected UUID", raw))
    })
}

fn select_solution_code(req: &VisualizeRequest) -> Result<String, ApiError> {
    req.solution_code
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .or_else(|| {
            req.solution_codes
                .as_ref()
                .and_then(|codes| codes.visualization_source())
        })
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError::BadRequest(
                "No compatible solution code (Python, C++, C, JS) is available to generate a visualization."
                    .to_string(),
            )
        })
}

//! HTTP handler modules for the algoviz API.
//!
//! Each sub-module implements thin handlers that parse requests, run the
//! model flows or a player transition, and return JSON responses. Playback
//! logic lives in `algoviz-core`.

pub mod problems;
pub mod sessions;
pub mod topics;
pub mod ui;

use axum::Json;

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "status": "ok" }))
}

//! Router assembly for the algoviz HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Web client
        .route("/", get(handlers::ui::index))
        .route("/app.js", get(handlers::ui::app_js))
        .route("/styles.css", get(handlers::ui::styles_css))
        // Problem analysis
        .route("/problems/analyze", post(handlers::problems::analyze))
        .route(
            "/topics/visualization-url",
            get(handlers::topics::visualization_link),
        )
        // Player sessions
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route(
            "/sessions/{id}/visualize",
            post(handlers::sessions::visualize),
        )
        // Playback
        .route("/sessions/{id}/next", post(handlers::sessions::next))
        .route("/sessions/{id}/previous", post(handlers::sessions::previous))
        .route("/sessions/{id}/reset", post(handlers::sessions::reset))
        .route("/sessions/{id}/jump", post(handlers::sessions::jump))
        .route("/sessions/{id}/play", post(handlers::sessions::toggle_play))
        .route("/sessions/{id}/tick", post(handlers::sessions::tick))
        .route("/sessions/{id}/speed", post(handlers::sessions::set_speed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

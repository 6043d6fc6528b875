//! Static web client.

use axum::http::header;
use axum::response::{Html, IntoResponse};

/// Serves the single-page client shell.
///
/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Serves client JavaScript.
///
/// `GET /app.js`
pub async fn app_js() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        include_str!("../../static/app.js"),
    )
}

/// Serves client CSS.
///
/// `GET /styles.css`
pub async fn styles_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../../static/styles.css"),
    )
}

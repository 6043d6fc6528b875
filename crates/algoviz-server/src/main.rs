//! Binary entrypoint for the algoviz HTTP server.
//!
//! Configuration is read from `ALGOVIZ_*` environment variables; see
//! [`algoviz_server::config`]. Log filtering follows `RUST_LOG` (default:
//! `info`).

use algoviz_server::config::ServerConfig;
use algoviz_server::router::build_router;
use algoviz_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    if !config.llm.is_configured() {
        tracing::warn!("no model provider configured; generation endpoints will return 503");
    }

    let state = AppState::new(&config);
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };
    tracing::info!("algoviz server starting on {}", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", err);
        std::process::exit(1);
    }
}

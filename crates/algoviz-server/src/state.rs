//! Application state shared by all handlers.
//!
//! [`AppState`] is cheap to clone: the model client and the session registry
//! sit behind `Arc`s. Player sessions synchronize per entry inside the
//! registry, so no global lock is needed.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::llm_provider::{ModelClient, ProviderClient};
use crate::session::SessionRegistry;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    /// Generative model used by the problem, solution and trace flows.
    pub model: Arc<dyn ModelClient>,
    /// Per-browser animation players.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates state from configuration and starts the idle-session sweep.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &ServerConfig) -> Self {
        let model: Arc<dyn ModelClient> = Arc::new(ProviderClient::new(config.llm.clone()));
        let state = Self::with_model(model);
        state
            .sessions
            .start_expiry_sweep(SWEEP_INTERVAL, config.session_ttl);
        state
    }

    /// Creates state around an arbitrary model client, without background
    /// tasks (for testing).
    pub fn with_model(model: Arc<dyn ModelClient>) -> Self {
        AppState {
            model,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}

//! Player sessions: one animation player per browser session.
//!
//! [`SessionRegistry`] is backed by `DashMap` for concurrent access from async
//! handler tasks. An entry is only held for the duration of a synchronous
//! player transition, never across an `.await`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use algoviz_core::{render_frame, AutoPlay, Frame, ParsedTrace, Player, TraceError};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique session identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player with its auto-play layer and bookkeeping.
#[derive(Debug)]
pub struct PlayerSession {
    pub player: Player,
    pub autoplay: AutoPlay,
    pub last_active: Instant,
}

impl PlayerSession {
    fn new() -> Self {
        PlayerSession {
            player: Player::new(),
            autoplay: AutoPlay::new(),
            last_active: Instant::now(),
        }
    }

    pub fn frame(&self) -> Frame {
        render_frame(&self.player, Some(&self.autoplay))
    }
}

/// Ticket for an in-flight visualization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub session: SessionId,
    pub generation: u64,
}

/// What happened when a model delivery reached its session.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Loaded(Frame),
    Rejected { frame: Frame, error: TraceError },
    /// A newer request replaced this one, or the session is gone.
    Superseded,
}

pub struct SessionRegistry {
    sessions: DashMap<SessionId, PlayerSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: DashMap::new(),
        }
    }

    pub fn create(&self) -> (SessionId, Frame) {
        let id = SessionId(Uuid::new_v4());
        let session = PlayerSession::new();
        let frame = session.frame();
        self.sessions.insert(id, session);
        tracing::info!(session = %id, "player session created");
        (id, frame)
    }

    /// Removes a session. Returns `true` if it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Runs a synchronous transition on a session and returns its result.
    ///
    /// Returns `None` if the session does not exist.
    pub fn with_session<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut PlayerSession) -> R,
    ) -> Option<R> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_active = Instant::now();
        Some(f(entry.value_mut()))
    }

    /// Starts a visualization request: cancels auto-play and drops the old
    /// trace so nothing plays against it while the model runs.
    pub fn begin_load(&self, id: &SessionId) -> Option<PendingLoad> {
        self.with_session(id, |session| {
            session.autoplay.cancel();
            session.player.clear();
            PendingLoad {
                session: *id,
                generation: session.player.generation(),
            }
        })
    }

    /// Hands a parsed trace to the session if no newer request started since
    /// `pending` was issued.
    pub fn finish_load(
        &self,
        pending: PendingLoad,
        parsed: ParsedTrace,
        final_output: Option<String>,
    ) -> Delivery {
        self.with_session(&pending.session, |session| {
            if session.player.generation() != pending.generation {
                tracing::info!(
                    session = %pending.session,
                    expected = pending.generation,
                    actual = session.player.generation(),
                    "dropping superseded trace delivery"
                );
                return Delivery::Superseded;
            }
            session.autoplay.cancel();
            match session.player.load_parsed(parsed, final_output) {
                Ok(()) => Delivery::Loaded(session.frame()),
                Err(error) => Delivery::Rejected {
                    frame: session.frame(),
                    error,
                },
            }
        })
        .unwrap_or(Delivery::Superseded)
    }

    /// Removes sessions that have been inactive longer than `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_inactive(&self, timeout: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let active = now.duration_since(session.last_active) < timeout;
            if !active {
                removed += 1;
            }
            active
        });
        removed
    }

    /// Spawns a background task sweeping idle sessions every `interval`.
    pub fn start_expiry_sweep(self: &Arc<Self>, interval: Duration, timeout: Duration) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let removed = registry.sweep_inactive(timeout);
                if removed > 0 {
                    tracing::info!("Swept {} idle player session(s)", removed);
                }
            }
        });
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

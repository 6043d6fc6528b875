//! Timer-driven auto-play layered on [`Player::next`].
//!
//! The timer itself lives with the host (a browser interval, a tokio sleep).
//! Each tick names the player generation it was scheduled against; a tick for
//! an older generation is discarded without touching the player.

use std::time::Duration;

use serde::Serialize;

use crate::playback::Player;

/// Slider midpoint.
pub const DEFAULT_SPEED: u8 = 50;
pub const MAX_SPEED: u8 = 100;

const BASE_DELAY_MS: u64 = 50;
const DELAY_PER_SPEED_MS: u64 = 15;

/// Result of one auto-play tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// Auto-play is paused; nothing happened.
    Idle,
    /// The tick belonged to a replaced trace and was dropped.
    Stale,
    /// Moved one step forward; more steps remain.
    Advanced,
    /// Moved onto the terminal step and stopped.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPlay {
    playing: bool,
    speed: u8,
    bound_generation: Option<u64>,
}

impl Default for AutoPlay {
    fn default() -> Self {
        AutoPlay {
            playing: false,
            speed: DEFAULT_SPEED,
            bound_generation: None,
        }
    }
}

impl AutoPlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// 0 is fastest, 100 slowest.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.min(MAX_SPEED);
    }

    /// Interval between ticks at the current speed.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(BASE_DELAY_MS + u64::from(self.speed) * DELAY_PER_SPEED_MS)
    }

    /// Play/pause. At the terminal step this replays from the start.
    pub fn toggle(&mut self, player: &mut Player) {
        if self.playing {
            self.cancel();
            return;
        }
        if !player.has_trace() || player.len() < 2 {
            return;
        }
        if player.is_at_end() {
            player.reset();
        }
        self.playing = true;
        self.bound_generation = Some(player.generation());
    }

    /// Stops without touching the player's position.
    pub fn cancel(&mut self) {
        self.playing = false;
        self.bound_generation = None;
    }

    /// Advances `player` by one step if this tick is current.
    pub fn tick(&mut self, player: &mut Player, generation: u64) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }
        let current = player.generation();
        if generation != current || self.bound_generation != Some(current) {
            self.cancel();
            return TickOutcome::Stale;
        }
        player.next();
        if player.is_at_end() {
            self.cancel();
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        }
    }
}

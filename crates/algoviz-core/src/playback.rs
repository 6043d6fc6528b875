//! Playback state machine over one immutable trace.
//!
//! [`Player`] is a small owned struct: the trace (or none), the current
//! position, the final output and the colours derived from the trace. Every
//! transition is synchronous and clamped, so `current` always stays within
//! `[0, len-1]` while a trace is loaded.
//!
//! The generation counter is bumped whenever the trace is replaced or
//! cleared. Asynchronous producers (model deliveries, auto-play timers)
//! remember the generation they were started against and are ignored once it
//! moves on.

use crate::colors::{Color, PointerColors};
use crate::error::TraceError;
use crate::parse::ParsedTrace;
use crate::step::Step;
use crate::trace::Trace;

#[derive(Debug, Clone, Default)]
pub struct Player {
    trace: Option<Trace>,
    current: usize,
    final_output: Option<String>,
    colors: PointerColors,
    generation: u64,
}

impl Player {
    /// A player in the no-trace state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(trace: Trace, final_output: Option<String>) -> Self {
        let mut player = Self::new();
        player.load(trace, final_output);
        player
    }

    /// Replaces the trace in full and resets to the initial step.
    pub fn load(&mut self, trace: Trace, final_output: Option<String>) {
        self.colors = PointerColors::from_trace(&trace);
        self.trace = Some(trace);
        self.final_output = final_output;
        self.generation += 1;
        self.reset();
    }

    /// Loads a parser outcome. An invalid payload leaves the player with no
    /// trace and hands the reason back for display.
    pub fn load_parsed(
        &mut self,
        parsed: ParsedTrace,
        final_output: Option<String>,
    ) -> Result<(), TraceError> {
        match parsed {
            ParsedTrace::Valid(trace) => {
                self.load(trace, final_output);
                Ok(())
            }
            ParsedTrace::Invalid(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Drops the trace, entering the no-trace state.
    pub fn clear(&mut self) {
        self.trace = None;
        self.final_output = None;
        self.colors = PointerColors::default();
        self.current = 0;
        self.generation += 1;
    }

    pub fn next(&mut self) {
        if let Some(last) = self.last_position() {
            self.current = (self.current + 1).min(last);
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Moves to `clamp(position, 0, len-1)`. Accepts any integer.
    pub fn jump_to(&mut self, position: i64) {
        if let Some(last) = self.last_position() {
            self.current = usize::try_from(position.max(0)).unwrap_or(usize::MAX).min(last);
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub fn has_trace(&self) -> bool {
        self.trace.is_some()
    }

    /// Number of steps; zero without a trace.
    pub fn len(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_none()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.trace.as_ref()?.get(self.current)
    }

    /// True at the initial step, and always without a trace.
    pub fn is_at_start(&self) -> bool {
        self.current == 0
    }

    /// True at the terminal step, and always without a trace.
    pub fn is_at_end(&self) -> bool {
        self.last_position().map_or(true, |last| self.current == last)
    }

    pub fn pointer_color(&self, name: &str) -> Option<Color> {
        self.colors.get(name)
    }

    pub fn colors(&self) -> &PointerColors {
        &self.colors
    }

    /// The trace's final output, only while the terminal step is shown.
    pub fn final_output(&self) -> Option<&str> {
        if self.has_trace() && self.is_at_end() {
            self.final_output.as_deref()
        } else {
            None
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn last_position(&self) -> Option<usize> {
        self.trace.as_ref().map(Trace::last_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_trace;
    use proptest::prelude::*;

    fn two_sum() -> Trace {
        Trace::new(vec![
            Step::new(1, "init")
                .with_array([2i64, 7, 11, 15])
                .with_pointer("i", 0)
                .with_highlight([0]),
            Step::new(2, "match")
                .with_array([2i64, 7, 11, 15])
                .with_pointer("i", 1)
                .with_highlight([1]),
        ])
        .unwrap()
    }

    fn trace_of_len(len: usize) -> Trace {
        Trace::new((0..len).map(|i| Step::new(i as i64 + 1, "s")).collect()).unwrap()
    }

    #[test]
    fn two_step_scenario_clamps_at_end() {
        let mut player = Player::with_trace(two_sum(), Some("[0, 1]".to_string()));
        assert_eq!(player.current_index(), 0);
        assert!(player.is_at_start());
        assert!(!player.is_at_end());
        assert_eq!(player.final_output(), None);

        player.next();
        assert_eq!(player.current_index(), 1);
        assert!(player.is_at_end());
        assert_eq!(player.final_output(), Some("[0, 1]"));

        player.next();
        assert_eq!(player.current_index(), 1);
        assert_eq!(player.current_step().unwrap().description, "match");
    }

    #[test]
    fn previous_clamps_at_start() {
        let mut player = Player::with_trace(two_sum(), None);
        player.previous();
        assert_eq!(player.current_index(), 0);
    }

    #[test]
    fn terminal_step_is_not_a_dead_end() {
        let mut player = Player::with_trace(trace_of_len(4), None);
        player.jump_to(3);
        assert!(player.is_at_end());
        player.previous();
        assert_eq!(player.current_index(), 2);
        player.jump_to(0);
        assert!(player.is_at_start());
    }

    #[test]
    fn no_trace_state() {
        let mut player = Player::new();
        assert!(!player.has_trace());
        assert!(player.current_step().is_none());
        assert!(player.is_at_start());
        assert!(player.is_at_end());
        player.next();
        player.jump_to(5);
        player.previous();
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.final_output(), None);
        assert_eq!(player.len(), 0);
    }

    #[test]
    fn load_resets_and_bumps_generation() {
        let mut player = Player::with_trace(trace_of_len(5), None);
        let first_generation = player.generation();
        player.jump_to(4);
        player.load(two_sum(), None);
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.len(), 2);
        assert!(player.generation() > first_generation);
    }

    #[test]
    fn load_parsed_invalid_clears() {
        let mut player = Player::with_trace(two_sum(), Some("out".to_string()));
        let before = player.generation();
        let err = player.load_parsed(parse_trace("{}"), None).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TRACE");
        assert!(!player.has_trace());
        assert!(player.pointer_color("i").is_none());
        assert!(player.generation() > before);

        assert!(player.load_parsed(parse_trace("[]"), None).is_err());
        assert!(player.load_parsed(parse_trace("not json"), None).is_err());
        assert!(!player.has_trace());
    }

    #[test]
    fn pointer_color_is_stable_across_steps() {
        let mut player = Player::with_trace(two_sum(), None);
        let at_first = player.pointer_color("i");
        player.next();
        assert_eq!(player.pointer_color("i"), at_first);
        assert!(at_first.is_some());
    }

    proptest! {
        #[test]
        fn index_stays_in_range(len in 1usize..20, moves in prop::collection::vec(any::<bool>(), 0..60)) {
            let mut player = Player::with_trace(trace_of_len(len), None);
            for forward in moves {
                if forward { player.next() } else { player.previous() }
                prop_assert!(player.current_index() < len);
            }
        }

        #[test]
        fn jump_to_clamps(len in 1usize..20, target in any::<i64>()) {
            let mut player = Player::with_trace(trace_of_len(len), None);
            player.jump_to(target);
            let expected = target.clamp(0, len as i64 - 1) as usize;
            prop_assert_eq!(player.current_index(), expected);
        }

        #[test]
        fn reset_returns_to_start(len in 1usize..20, target in 0i64..20) {
            let mut player = Player::with_trace(trace_of_len(len), None);
            player.jump_to(target);
            player.reset();
            prop_assert_eq!(player.current_index(), 0);
        }
    }
}

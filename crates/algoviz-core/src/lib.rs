//! Trace-driven animation playback for algorithm visualizations.
//!
//! A generative model describes an algorithm run as a JSON array of steps.
//! This crate validates that payload ([`parse`]), steps through it
//! ([`playback`], [`autoplay`]), assigns stable pointer colours ([`colors`])
//! and produces a pure render model of the current step ([`frame`]).

pub mod autoplay;
pub mod colors;
pub mod error;
pub mod frame;
pub mod parse;
pub mod playback;
pub mod step;
pub mod trace;

// Re-export commonly used types
pub use autoplay::{AutoPlay, TickOutcome};
pub use colors::{Color, PointerColors, DEFAULT_PALETTE};
pub use error::TraceError;
pub use frame::{render_frame, Frame, StepFrame};
pub use parse::{parse_trace, strip_code_fence, ParsedTrace};
pub use playback::Player;
pub use step::{ScalarValue, Step};
pub use trace::Trace;

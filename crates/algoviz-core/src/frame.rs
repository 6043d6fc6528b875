//! Pure render model of the animation surface.
//!
//! [`annotate`] resolves, for every array position of a step, the pointers
//! referencing it and its highlight state. [`render_frame`] wraps that with
//! the step text, the finished banner and the control states. Hosts (the web
//! client, the terminal player) draw a [`Frame`] without further logic.

use serde::Serialize;

use crate::autoplay::AutoPlay;
use crate::colors::{Color, PointerColors, DEFAULT_PALETTE};
use crate::playback::Player;
use crate::step::{ScalarValue, Step};

const MIN_BAR_HEIGHT: u32 = 10;
const MAX_BAR_HEIGHT: u32 = 320;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointerMarker {
    pub name: String,
    pub color: Color,
}

/// Per-position pointer and highlight state of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAnnotation {
    pub position: usize,
    pub pointers: Vec<PointerMarker>,
    pub highlighted: bool,
}

/// Resolves pointers and highlights for every position of `step`.
///
/// Pointers that do not land on a position are skipped; several pointers on
/// one position are all kept, in the step's pointer order.
pub fn annotate(step: &Step, colors: &PointerColors) -> Vec<CellAnnotation> {
    (0..step.array_state.len())
        .map(|position| CellAnnotation {
            position,
            pointers: step
                .pointers_at(position)
                .map(|name| PointerMarker {
                    name: name.to_string(),
                    color: colors.get(name).unwrap_or(DEFAULT_PALETTE[0]),
                })
                .collect(),
            highlighted: step.is_highlighted(position),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub position: usize,
    pub value: ScalarValue,
    pub label: String,
    pub bar_height: u32,
    pub pointers: Vec<PointerMarker>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayAction {
    Play,
    Pause,
    Replay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub can_previous: bool,
    pub can_next: bool,
    pub can_rewind: bool,
    pub playing: bool,
    pub play_action: PlayAction,
    pub speed: u8,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFrame {
    /// 1-based position within the trace.
    pub position: usize,
    pub total: usize,
    /// Step number reported by the producer.
    pub index: i64,
    pub description: String,
    pub cells: Vec<Cell>,
    pub legend: Vec<PointerMarker>,
    /// Final output text, present only on the terminal step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<String>,
    pub controls: Controls,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Frame {
    NoTrace,
    Step(StepFrame),
}

impl Frame {
    pub fn as_step(&self) -> Option<&StepFrame> {
        match self {
            Frame::NoTrace => None,
            Frame::Step(frame) => Some(frame),
        }
    }
}

/// Renders the player's current state.
pub fn render_frame(player: &Player, autoplay: Option<&AutoPlay>) -> Frame {
    let Some(step) = player.current_step() else {
        return Frame::NoTrace;
    };
    let colors = player.colors();
    let default_auto = AutoPlay::default();
    let auto = autoplay.unwrap_or(&default_auto);

    let cells = annotate(step, colors)
        .into_iter()
        .zip(&step.array_state)
        .map(|(annotation, value)| Cell {
            position: annotation.position,
            value: value.clone(),
            label: value.to_string(),
            bar_height: bar_height(value),
            pointers: annotation.pointers,
            highlighted: annotation.highlighted,
        })
        .collect();

    let at_end = player.is_at_end();
    let finished = at_end.then(|| player.final_output().unwrap_or_default().to_string());
    let play_action = if auto.is_playing() {
        PlayAction::Pause
    } else if at_end {
        PlayAction::Replay
    } else {
        PlayAction::Play
    };

    Frame::Step(StepFrame {
        position: player.current_index() + 1,
        total: player.len(),
        index: step.index,
        description: step.description.clone(),
        cells,
        legend: colors
            .iter()
            .map(|(name, color)| PointerMarker {
                name: name.to_string(),
                color,
            })
            .collect(),
        finished,
        controls: Controls {
            can_previous: !player.is_at_start(),
            can_next: !at_end,
            can_rewind: !player.is_at_start(),
            playing: auto.is_playing(),
            play_action,
            speed: auto.speed(),
            delay_ms: u64::try_from(auto.delay().as_millis()).unwrap_or(u64::MAX),
        },
        generation: player.generation(),
    })
}

/// Bar height in pixels for a cell value; non-numeric values get the minimum.
pub fn bar_height(value: &ScalarValue) -> u32 {
    match value.as_f64() {
        Some(v) if v.is_finite() => {
            let scaled = (v * 10.0 + 10.0).clamp(MIN_BAR_HEIGHT as f64, MAX_BAR_HEIGHT as f64);
            scaled.round() as u32
        }
        _ => MIN_BAR_HEIGHT,
    }
}

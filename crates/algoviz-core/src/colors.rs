//! Stable pointer colours for a whole trace.
//!
//! [`PointerColors`] is a pure function of the trace's pointer-name
//! first-occurrence order: step order first, then each step's own pointer
//! order. It is computed once per trace so a pointer keeps its colour in
//! every step it appears in.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::trace::Trace;

/// CSS hex colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color(pub &'static str);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Blue, red, green, orange, violet, pink.
pub const DEFAULT_PALETTE: [Color; 6] = [
    Color("#3b82f6"),
    Color("#ef4444"),
    Color("#22c55e"),
    Color("#f97316"),
    Color("#8b5cf6"),
    Color("#ec4899"),
];

/// Mapping from pointer name to colour, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointerColors {
    by_name: IndexMap<String, Color>,
}

impl PointerColors {
    pub fn from_trace(trace: &Trace) -> Self {
        Self::with_palette(trace, &DEFAULT_PALETTE)
    }

    /// Assigns `palette[i mod len]` to the i-th distinct pointer name.
    ///
    /// An empty palette yields an empty mapping.
    pub fn with_palette(trace: &Trace, palette: &[Color]) -> Self {
        let mut by_name = IndexMap::new();
        if palette.is_empty() {
            return PointerColors { by_name };
        }
        for step in trace.steps() {
            for name in step.pointers.keys() {
                if !by_name.contains_key(name) {
                    let color = palette[by_name.len() % palette.len()];
                    by_name.insert(name.clone(), color);
                }
            }
        }
        PointerColors { by_name }
    }

    pub fn get(&self, name: &str) -> Option<Color> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.by_name.iter().map(|(name, color)| (name.as_str(), *color))
    }
}

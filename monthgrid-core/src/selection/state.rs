//! Selection mode and the mode-tagged selection value.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;
use crate::error::CalendarError;

/// Whether the calendar holds one selected day or a set of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SelectionMode::Single => write!(f, "single"),
            SelectionMode::Multiple => write!(f, "multiple"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(SelectionMode::Single),
            "multiple" | "multi" => Ok(SelectionMode::Multiple),
            other => Err(CalendarError::Config(format!(
                "unknown selection mode '{}', expected 'single' or 'multiple'",
                other
            ))),
        }
    }
}

/// The current selection. The variant always matches the active mode, so a
/// single-mode calendar cannot hold a set and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "selected", rename_all = "lowercase")]
pub enum SelectionState {
    Single(Option<CalendarDay>),
    Multiple(BTreeSet<CalendarDay>),
}

impl SelectionState {
    /// An empty selection for `mode`.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => SelectionState::Single(None),
            SelectionMode::Multiple => SelectionState::Multiple(BTreeSet::new()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionState::Single(_) => SelectionMode::Single,
            SelectionState::Multiple(_) => SelectionMode::Multiple,
        }
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        match self {
            SelectionState::Single(selected) => *selected == Some(day),
            SelectionState::Multiple(selected) => selected.contains(&day),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SelectionState::Single(selected) => selected.is_none(),
            SelectionState::Multiple(selected) => selected.is_empty(),
        }
    }

    /// Selected days in ascending order.
    pub fn days(&self) -> Vec<CalendarDay> {
        match self {
            SelectionState::Single(selected) => selected.iter().copied().collect(),
            SelectionState::Multiple(selected) => selected.iter().copied().collect(),
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::empty(SelectionMode::default())
    }
}

//! Error types for the monthgrid engine.
//!
//! Three outcomes are local and recoverable: an unrepresentable date
//! ([`CalendarError::InvalidDate`]), a refused selection ([`Rejected`]) and a
//! lookup outside the configured range ([`NotFound`]).

use thiserror::Error;

use crate::day::{CalendarDay, YearMonth};

/// Errors that can occur while normalizing dates, selecting days or loading
/// configuration.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Rejected(#[from] Rejected),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Why a selection attempt did not change the selection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("{day} is before the first selectable date {first}")]
    BeforeFirstSelectable { day: CalendarDay, first: CalendarDay },

    #[error("{0} was refused by the selection hook")]
    Vetoed(CalendarDay),
}

impl Rejected {
    pub fn day(&self) -> CalendarDay {
        match self {
            Rejected::BeforeFirstSelectable { day, .. } => *day,
            Rejected::Vetoed(day) => *day,
        }
    }
}

/// A month that lies outside the displayed range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{month} is outside the displayed range")]
pub struct NotFound {
    pub month: YearMonth,
}

//! Core engine for scrolling month calendars.
//!
//! This crate turns a date range and a calendar system into a grid of months,
//! weeks and day cells, and keeps the user's selection consistent with the
//! selection mode and the selectable range:
//! - `calendar` and `normalize` reduce dates to calendar days
//! - `grid` lays months out in week rows
//! - `selection` holds the single or multiple selection
//! - `scroll` maps dates and offsets to months
//! - `view` ties them together behind one stateful type

pub mod calendar;
pub mod day;
pub mod error;
pub mod grid;
pub mod grid_config;
pub mod normalize;
pub mod scroll;
pub mod selection;
pub mod view;

// Re-export the types most callers need at crate root for convenience
pub use calendar::{CalendarSystem, Gregorian};
pub use day::{CalendarDay, YearMonth};
pub use error::{CalendarError, CalendarResult, NotFound, Rejected};
pub use grid::{CalendarGridModel, DayCell, MonthDescriptor, MonthGridBuilder, WeekRow};
pub use selection::{AppliedSelection, SelectionHooks, SelectionMode, SelectionState};
pub use view::{CalendarView, ScrollRequest};

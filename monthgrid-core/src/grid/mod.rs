//! Month grid construction.
//!
//! Building happens in two passes. [`GridShape`] places every day of every
//! month into week slots and depends only on the date bounds and the
//! calendar. [`GridShape::flag`] then fills in `is_selectable` and
//! `is_selected` for each cell from a [`CellFlags`] source, producing the
//! [`CalendarGridModel`] a renderer draws. Selection changes only repeat the
//! second pass.

mod model;
mod shape;

pub use model::{CalendarGridModel, CellFlags, DayCell, MonthDescriptor, Unflagged, WeekRow};
pub use shape::{GridShape, MonthShape, WeekSlots};

use crate::calendar::CalendarSystem;
use crate::error::CalendarResult;
use crate::normalize::IntoCalendarDay;

/// Columns in a week row.
pub const DAYS_PER_WEEK: usize = 7;

/// Builds flagged grid models in one call.
pub struct MonthGridBuilder;

impl MonthGridBuilder {
    /// Build the model for the months from `first` to `last` inclusive.
    ///
    /// An inverted range yields an empty model rather than an error.
    pub fn build<F, L>(
        first: F,
        last: L,
        calendar: &dyn CalendarSystem,
        flags: &dyn CellFlags,
    ) -> CalendarResult<CalendarGridModel>
    where
        F: IntoCalendarDay,
        L: IntoCalendarDay,
    {
        Ok(GridShape::build(first, last, calendar)?.flag(flags))
    }
}

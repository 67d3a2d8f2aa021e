//! Flagged grid model handed to renderers.

use serde::Serialize;

use crate::day::{CalendarDay, YearMonth};
use crate::grid::DAYS_PER_WEEK;

/// Source of per-cell selection flags.
pub trait CellFlags {
    fn is_selectable(&self, day: CalendarDay) -> bool;
    fn is_selected(&self, day: CalendarDay) -> bool;
}

/// Flags nothing: every day selectable, none selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unflagged;

impl CellFlags for Unflagged {
    fn is_selectable(&self, _day: CalendarDay) -> bool {
        true
    }

    fn is_selected(&self, _day: CalendarDay) -> bool {
        false
    }
}

/// A single slot in a week row.
///
/// `date` is `None` for padding before the 1st or after the last day of the
/// month. Padding is never selectable or selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DayCell {
    pub date: Option<CalendarDay>,
    pub is_selectable: bool,
    pub is_selected: bool,
}

impl DayCell {
    pub(crate) fn for_slot(slot: Option<CalendarDay>, flags: &dyn CellFlags) -> Self {
        match slot {
            Some(day) => DayCell {
                date: Some(day),
                is_selectable: flags.is_selectable(day),
                is_selected: flags.is_selected(day),
            },
            None => DayCell::default(),
        }
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

/// Seven cells, one per weekday column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekRow {
    cells: [DayCell; DAYS_PER_WEEK],
}

impl WeekRow {
    pub fn new(cells: [DayCell; DAYS_PER_WEEK]) -> Self {
        WeekRow { cells }
    }

    pub fn cells(&self) -> &[DayCell; DAYS_PER_WEEK] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter()
    }
}

/// A month and its week rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthDescriptor {
    pub month_start: CalendarDay,
    pub weeks: Vec<WeekRow>,
}

impl MonthDescriptor {
    pub fn new(month_start: CalendarDay, weeks: Vec<WeekRow>) -> Self {
        MonthDescriptor { month_start, weeks }
    }

    pub fn year_month(&self) -> YearMonth {
        self.month_start.year_month()
    }

    /// Concrete (non-padding) cells in ascending day order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks
            .iter()
            .flat_map(WeekRow::iter)
            .filter(|cell| !cell.is_padding())
    }

    pub fn cell(&self, day: CalendarDay) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == Some(day))
    }
}

/// Months from the first to the last displayed month, contiguous and in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CalendarGridModel {
    months: Vec<MonthDescriptor>,
}

impl CalendarGridModel {
    pub fn new(months: Vec<MonthDescriptor>) -> Self {
        CalendarGridModel { months }
    }

    pub fn months(&self) -> &[MonthDescriptor] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn month(&self, index: usize) -> Option<&MonthDescriptor> {
        self.months.get(index)
    }

    /// Zero-based position of `month`, if displayed.
    pub fn position(&self, month: YearMonth) -> Option<usize> {
        self.months
            .binary_search_by(|m| m.year_month().cmp(&month))
            .ok()
    }

    /// The cell showing `day`, if its month is displayed.
    pub fn cell(&self, day: CalendarDay) -> Option<&DayCell> {
        let index = self.position(day.year_month())?;
        self.months[index].cell(day)
    }
}

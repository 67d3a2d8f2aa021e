//! Selection-independent grid shape: which day sits in which week slot.

use crate::calendar::{CalendarSystem, weekday_column};
use crate::day::{CalendarDay, YearMonth};
use crate::error::CalendarResult;
use crate::grid::DAYS_PER_WEEK;
use crate::grid::model::{CalendarGridModel, CellFlags, DayCell, MonthDescriptor, WeekRow};
use crate::normalize::{IntoCalendarDay, normalize};

/// One week of slots; `None` is padding outside the month.
pub type WeekSlots = [Option<CalendarDay>; DAYS_PER_WEEK];

/// The week slots of a single month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthShape {
    month: YearMonth,
    weeks: Vec<WeekSlots>,
}

impl MonthShape {
    /// Lay out `month` in week rows aligned to the calendar's first weekday.
    pub fn build(month: YearMonth, calendar: &dyn CalendarSystem) -> CalendarResult<Self> {
        let first = calendar.validate(month.first_day())?;
        let day_count = calendar.days_in_month(month)?;
        let leading = weekday_column(calendar.weekday(first)?, calendar.first_weekday());

        let mut slots: Vec<Option<CalendarDay>> =
            Vec::with_capacity(leading + day_count as usize + DAYS_PER_WEEK);
        slots.resize(leading, None);
        slots.extend(
            (1..=day_count).map(|day| Some(CalendarDay::new(month.year, month.month, day))),
        );

        let trailing = (DAYS_PER_WEEK - slots.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        slots.resize(slots.len() + trailing, None);

        let weeks = slots
            .chunks_exact(DAYS_PER_WEEK)
            .map(|chunk| {
                let mut week = [None; DAYS_PER_WEEK];
                week.copy_from_slice(chunk);
                week
            })
            .collect();

        Ok(MonthShape { month, weeks })
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn month_start(&self) -> CalendarDay {
        self.month.first_day()
    }

    pub fn weeks(&self) -> &[WeekSlots] {
        &self.weeks
    }

    /// Days of the month in ascending order, padding skipped.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.weeks.iter().flatten().filter_map(|slot| *slot)
    }

    fn flag(&self, flags: &dyn CellFlags) -> MonthDescriptor {
        let weeks = self
            .weeks
            .iter()
            .map(|week| WeekRow::new(week.map(|slot| DayCell::for_slot(slot, flags))))
            .collect();

        MonthDescriptor::new(self.month_start(), weeks)
    }
}

/// Months from the first bound's month to the last bound's month inclusive.
///
/// The shape depends only on the bounds and the calendar, so it can be kept
/// across selection changes and re-flagged with [`GridShape::flag`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridShape {
    months: Vec<MonthShape>,
}

impl GridShape {
    /// Build the shape for `[first, last]`.
    ///
    /// Only the month and year of each bound matter. When `first` falls in a
    /// later month than `last` the shape is empty.
    pub fn build<F, L>(first: F, last: L, calendar: &dyn CalendarSystem) -> CalendarResult<Self>
    where
        F: IntoCalendarDay,
        L: IntoCalendarDay,
    {
        let start = normalize(first, calendar)?.year_month();
        let end = normalize(last, calendar)?.year_month();

        let mut months = Vec::new();
        if start <= end {
            let mut month = start;
            loop {
                months.push(MonthShape::build(month, calendar)?);
                if month == end {
                    break;
                }
                month = calendar.next_month(month)?;
            }
        }

        tracing::debug!(
            first = %start,
            last = %end,
            months = months.len(),
            calendar = calendar.identifier(),
            "built grid shape"
        );

        Ok(GridShape { months })
    }

    pub fn months(&self) -> &[MonthShape] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first_month(&self) -> Option<YearMonth> {
        self.months.first().map(MonthShape::month)
    }

    pub fn last_month(&self) -> Option<YearMonth> {
        self.months.last().map(MonthShape::month)
    }

    /// Whether `day`'s month is part of this shape.
    pub fn contains(&self, day: CalendarDay) -> bool {
        self.position(day.year_month()).is_some()
    }

    /// Zero-based position of `month`, if present.
    pub fn position(&self, month: YearMonth) -> Option<usize> {
        self.months.binary_search_by(|m| m.month.cmp(&month)).ok()
    }

    /// Compute per-cell flags against the current selection.
    pub fn flag(&self, flags: &dyn CellFlags) -> CalendarGridModel {
        CalendarGridModel::new(self.months.iter().map(|m| m.flag(flags)).collect())
    }
}

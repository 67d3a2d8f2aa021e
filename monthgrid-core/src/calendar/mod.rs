//! Pluggable calendar systems.
//!
//! The grid builder and the normalizer never do date arithmetic themselves;
//! everything that depends on the rules of a calendar (month lengths, the
//! weekday of a day, which zone "midnight" is in) goes through
//! [`CalendarSystem`].

mod gregorian;

pub use gregorian::Gregorian;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc, Weekday};

use crate::day::{CalendarDay, YearMonth};
use crate::error::{CalendarError, CalendarResult};

/// Rules for day, month and week arithmetic in one calendar.
///
/// Implementations are shared read-only between the grid, the selection
/// manager and the renderer, usually behind an `Arc<dyn CalendarSystem>`.
pub trait CalendarSystem: fmt::Debug + Send + Sync {
    /// Short identifier, e.g. `"gregorian"`.
    fn identifier(&self) -> &str;

    /// The weekday shown in the leftmost grid column.
    fn first_weekday(&self) -> Weekday;

    /// Number of months in `year`.
    fn months_in_year(&self, year: i32) -> CalendarResult<u32>;

    /// Number of days in `month`.
    fn days_in_month(&self, month: YearMonth) -> CalendarResult<u32>;

    /// The weekday `day` falls on.
    fn weekday(&self, day: CalendarDay) -> CalendarResult<Weekday>;

    /// The calendar day containing `instant`, in this calendar's time zone.
    fn day_of_instant(&self, instant: DateTime<Utc>) -> CalendarResult<CalendarDay>;

    /// The calendar day for a proleptic Gregorian civil date.
    fn day_of_civil(&self, date: NaiveDate) -> CalendarResult<CalendarDay>;

    /// Checks that `day` names a real day in this calendar.
    fn validate(&self, day: CalendarDay) -> CalendarResult<CalendarDay> {
        let months = self.months_in_year(day.year())?;
        if day.month() == 0 || day.month() > months {
            return Err(CalendarError::InvalidDate(format!(
                "{} has no month {} in the {} calendar",
                day.year(),
                day.month(),
                self.identifier()
            )));
        }

        let days = self.days_in_month(day.year_month())?;
        if day.day() == 0 || day.day() > days {
            return Err(CalendarError::InvalidDate(format!(
                "{} has no day {} in the {} calendar",
                day.year_month(),
                day.day(),
                self.identifier()
            )));
        }

        Ok(day)
    }

    /// The month after `month`, rolling over into the next year.
    fn next_month(&self, month: YearMonth) -> CalendarResult<YearMonth> {
        if month.month >= self.months_in_year(month.year)? {
            let year = month.year.checked_add(1).ok_or_else(|| {
                CalendarError::InvalidDate(format!("no year after {}", month.year))
            })?;
            Ok(YearMonth::new(year, 1))
        } else {
            Ok(YearMonth::new(month.year, month.month + 1))
        }
    }
}

/// The seven weekdays in grid column order, starting from the calendar's
/// first weekday.
pub fn weekday_columns(calendar: &dyn CalendarSystem) -> [Weekday; 7] {
    let mut columns = [calendar.first_weekday(); 7];
    for i in 1..columns.len() {
        columns[i] = columns[i - 1].succ();
    }
    columns
}

/// Zero-based grid column of `weekday` when weeks start on `first_weekday`.
pub fn weekday_column(weekday: Weekday, first_weekday: Weekday) -> usize {
    let offset =
        weekday.num_days_from_monday() as i64 - first_weekday.num_days_from_monday() as i64;
    offset.rem_euclid(7) as usize
}

//! Day-granularity normalization of date and date-time inputs.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::calendar::CalendarSystem;
use crate::day::CalendarDay;
use crate::error::CalendarResult;

/// Anything that can be reduced to a day in a calendar system.
///
/// Instants are split at midnight of the calendar's own time zone. Civil
/// (zone-less) dates and date-times keep their wall-clock day. Every
/// conversion is validated against the calendar.
pub trait IntoCalendarDay {
    fn into_calendar_day(self, calendar: &dyn CalendarSystem) -> CalendarResult<CalendarDay>;
}

impl IntoCalendarDay for CalendarDay {
    fn into_calendar_day(self, calendar: &dyn CalendarSystem) -> CalendarResult<CalendarDay> {
        calendar.validate(self)
    }
}

impl IntoCalendarDay for NaiveDate {
    fn into_calendar_day(self, calendar: &dyn CalendarSystem) -> CalendarResult<CalendarDay> {
        calendar.validate(calendar.day_of_civil(self)?)
    }
}

impl IntoCalendarDay for NaiveDateTime {
    fn into_calendar_day(self, calendar: &dyn CalendarSystem) -> CalendarResult<CalendarDay> {
        self.date().into_calendar_day(calendar)
    }
}

impl<Tz: TimeZone> IntoCalendarDay for DateTime<Tz> {
    fn into_calendar_day(self, calendar: &dyn CalendarSystem) -> CalendarResult<CalendarDay> {
        calendar.validate(calendar.day_of_instant(self.with_timezone(&Utc))?)
    }
}

/// Strip the time-of-day from `date`, rounding down to midnight in `calendar`.
pub fn normalize<D: IntoCalendarDay>(
    date: D,
    calendar: &dyn CalendarSystem,
) -> CalendarResult<CalendarDay> {
    date.into_calendar_day(calendar)
}

/// Compare two dates by calendar day only.
///
/// `Less`, `Equal` and `Greater` mean `a` is before, on the same day as, or
/// after `b`.
pub fn compare_by_day<A: IntoCalendarDay, B: IntoCalendarDay>(
    a: A,
    b: B,
    calendar: &dyn CalendarSystem,
) -> CalendarResult<Ordering> {
    Ok(normalize(a, calendar)?.cmp(&normalize(b, calendar)?))
}

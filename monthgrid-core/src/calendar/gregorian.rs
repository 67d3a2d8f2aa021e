//! The proleptic Gregorian calendar, evaluated in a fixed IANA time zone.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use super::CalendarSystem;
use crate::day::{CalendarDay, YearMonth};
use crate::error::{CalendarError, CalendarResult};

const MONTHS_PER_YEAR: u32 = 12;

/// Gregorian calendar rules plus the zone in which instants are split into days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gregorian {
    first_weekday: Weekday,
    time_zone: Tz,
}

impl Gregorian {
    pub fn new(first_weekday: Weekday, time_zone: Tz) -> Self {
        Gregorian {
            first_weekday,
            time_zone,
        }
    }

    /// Gregorian calendar with days split at UTC midnight.
    pub fn utc(first_weekday: Weekday) -> Self {
        Gregorian::new(first_weekday, Tz::UTC)
    }

    /// Gregorian calendar in a zone given by IANA name, e.g. `"Europe/Paris"`.
    pub fn with_time_zone_name(first_weekday: Weekday, name: &str) -> CalendarResult<Self> {
        let time_zone: Tz = name
            .parse()
            .map_err(|_| CalendarError::UnknownTimeZone(name.to_string()))?;
        Ok(Gregorian::new(first_weekday, time_zone))
    }

    /// The host's calendar: the system time zone with weeks starting on Sunday.
    ///
    /// Falls back to UTC when the system zone cannot be determined.
    pub fn current() -> Self {
        let time_zone = match iana_time_zone::get_timezone() {
            Ok(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(zone = %name, "unrecognized system time zone, using UTC");
                Tz::UTC
            }),
            Err(e) => {
                tracing::warn!(error = %e, "could not read system time zone, using UTC");
                Tz::UTC
            }
        };
        Gregorian::new(Weekday::Sun, time_zone)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn with_first_weekday(mut self, first_weekday: Weekday) -> Self {
        self.first_weekday = first_weekday;
        self
    }

    fn naive_date(&self, day: CalendarDay) -> CalendarResult<NaiveDate> {
        NaiveDate::from_ymd_opt(day.year(), day.month(), day.day()).ok_or_else(|| {
            CalendarError::InvalidDate(format!("{} is not a Gregorian date", day))
        })
    }
}

impl Default for Gregorian {
    fn default() -> Self {
        Gregorian::current()
    }
}

impl CalendarSystem for Gregorian {
    fn identifier(&self) -> &str {
        "gregorian"
    }

    fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    fn months_in_year(&self, year: i32) -> CalendarResult<u32> {
        // Years chrono cannot represent are outside this calendar.
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(CalendarError::InvalidDate(format!(
                "year {} is out of range",
                year
            )));
        }
        Ok(MONTHS_PER_YEAR)
    }

    fn days_in_month(&self, month: YearMonth) -> CalendarResult<u32> {
        self.naive_date(month.first_day())?;
        let days = match month.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if NaiveDate::from_ymd_opt(month.year, 2, 29).is_some() => 29,
            _ => 28,
        };
        Ok(days)
    }

    fn weekday(&self, day: CalendarDay) -> CalendarResult<Weekday> {
        Ok(self.naive_date(day)?.weekday())
    }

    fn day_of_instant(&self, instant: DateTime<Utc>) -> CalendarResult<CalendarDay> {
        let local = instant.with_timezone(&self.time_zone).date_naive();
        Ok(CalendarDay::new(local.year(), local.month(), local.day()))
    }

    fn day_of_civil(&self, date: NaiveDate) -> CalendarResult<CalendarDay> {
        Ok(CalendarDay::new(date.year(), date.month(), date.day()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_days_in_month() {
        let calendar = Gregorian::utc(Weekday::Sun);

        assert_eq!(calendar.days_in_month(YearMonth::new(2024, 1)).unwrap(), 31);
        assert_eq!(calendar.days_in_month(YearMonth::new(2024, 2)).unwrap(), 29);
        assert_eq!(calendar.days_in_month(YearMonth::new(2023, 2)).unwrap(), 28);
        assert_eq!(calendar.days_in_month(YearMonth::new(1900, 2)).unwrap(), 28);
        assert_eq!(calendar.days_in_month(YearMonth::new(2000, 2)).unwrap(), 29);
        assert_eq!(calendar.days_in_month(YearMonth::new(2024, 4)).unwrap(), 30);
        assert!(calendar.days_in_month(YearMonth::new(2024, 13)).is_err());
    }

    #[test]
    fn test_weekday() {
        let calendar = Gregorian::utc(Weekday::Sun);

        assert_eq!(
            calendar.weekday(CalendarDay::new(2024, 1, 1)).unwrap(),
            Weekday::Mon
        );
        assert_eq!(
            calendar.weekday(CalendarDay::new(2024, 2, 1)).unwrap(),
            Weekday::Thu
        );
        assert!(calendar.weekday(CalendarDay::new(2024, 2, 30)).is_err());
    }

    #[test]
    fn test_out_of_range_year_is_invalid() {
        let calendar = Gregorian::utc(Weekday::Sun);

        assert!(matches!(
            calendar.months_in_year(1_000_000),
            Err(CalendarError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_day_of_instant_uses_time_zone() {
        // 2024-03-01 02:30 UTC is still February 29th in New York.
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 2, 30, 0).unwrap();

        let utc = Gregorian::utc(Weekday::Sun);
        assert_eq!(
            utc.day_of_instant(instant).unwrap(),
            CalendarDay::new(2024, 3, 1)
        );

        let new_york = Gregorian::with_time_zone_name(Weekday::Sun, "America/New_York").unwrap();
        assert_eq!(
            new_york.day_of_instant(instant).unwrap(),
            CalendarDay::new(2024, 2, 29)
        );
    }

    #[test]
    fn test_unknown_time_zone() {
        let result = Gregorian::with_time_zone_name(Weekday::Sun, "Mars/Olympus_Mons");
        assert!(matches!(result, Err(CalendarError::UnknownTimeZone(_))));
    }
}

//! Day- and month-granularity date values.
//!
//! A [`CalendarDay`] is a plain `(year, month, day)` triple in whatever
//! calendar system produced it. Values are validated when they cross into the
//! engine through a [`CalendarSystem`](crate::calendar::CalendarSystem), so the
//! types here only carry data, ordering and formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

/// A date reduced to year, month and day.
///
/// Ordering is lexicographic on `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDay {
    /// Builds a day from its parts without consulting a calendar.
    ///
    /// Use [`CalendarSystem::validate`](crate::calendar::CalendarSystem::validate)
    /// to check the triple against a concrete calendar.
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        CalendarDay { year, month, day }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, starting at 1.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of the month, starting at 1.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// The first day of this day's month.
    pub fn month_start(&self) -> CalendarDay {
        CalendarDay::new(self.year, self.month, 1)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDay {
    type Err = CalendarError;

    /// Parse `YYYY-MM-DD`. A leading `-` marks a year before year zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            CalendarError::InvalidDate(format!("'{}' is not in YYYY-MM-DD format", s))
        };

        let mut parts = s.trim().rsplitn(3, '-');
        let day = parts.next().ok_or_else(invalid)?;
        let month = parts.next().ok_or_else(invalid)?;
        let year = parts.next().ok_or_else(invalid)?;

        Ok(CalendarDay::new(
            year.parse().map_err(|_| invalid())?,
            month.parse().map_err(|_| invalid())?,
            day.parse().map_err(|_| invalid())?,
        ))
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A year and month pair, used to walk and look up months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    /// The first day of the month.
    pub fn first_day(&self) -> CalendarDay {
        CalendarDay::new(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<CalendarDay> for YearMonth {
    fn from(day: CalendarDay) -> Self {
        day.year_month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_year_month_day() {
        let mut days = vec![
            CalendarDay::new(2024, 3, 1),
            CalendarDay::new(2023, 12, 31),
            CalendarDay::new(2024, 2, 29),
            CalendarDay::new(2024, 2, 10),
        ];
        days.sort();

        assert_eq!(
            days,
            vec![
                CalendarDay::new(2023, 12, 31),
                CalendarDay::new(2024, 2, 10),
                CalendarDay::new(2024, 2, 29),
                CalendarDay::new(2024, 3, 1),
            ]
        );
    }

    #[test]
    fn test_parse_and_display() {
        let day: CalendarDay = "2024-02-09".parse().unwrap();
        assert_eq!(day, CalendarDay::new(2024, 2, 9));
        assert_eq!(day.to_string(), "2024-02-09");

        let bce: CalendarDay = "-0044-03-15".parse().unwrap();
        assert_eq!(bce, CalendarDay::new(-44, 3, 15));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2024/02/09".parse::<CalendarDay>().is_err());
        assert!("2024-02".parse::<CalendarDay>().is_err());
        assert!("tomorrow".parse::<CalendarDay>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&CalendarDay::new(2024, 1, 5)).unwrap();
        assert_eq!(json, "\"2024-01-05\"");

        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CalendarDay::new(2024, 1, 5));
    }

    #[test]
    fn test_month_start() {
        let day = CalendarDay::new(2024, 1, 15);
        assert_eq!(day.month_start(), CalendarDay::new(2024, 1, 1));
        assert_eq!(day.year_month(), YearMonth::new(2024, 1));
    }
}

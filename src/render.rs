//! Terminal rendering for grid types.
//!
//! Extension traits that draw monthgrid-core values as colored text using
//! owo_colors.

use chrono::{Month, Weekday};
use monthgrid_core::calendar::weekday_columns;
use monthgrid_core::{CalendarSystem, DayCell, MonthDescriptor, WeekRow};
use owo_colors::OwoColorize;

/// Width of one day column, including the separating space
const CELL_WIDTH: usize = 4;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DayCell {
    fn render(&self) -> String {
        let Some(date) = self.date else {
            return " ".repeat(CELL_WIDTH);
        };

        let label = format!("{:>3}", date.day());
        let styled = if self.is_selected {
            label.reversed().bold().to_string()
        } else if self.is_selectable {
            label
        } else {
            label.dimmed().to_string()
        };
        format!("{} ", styled)
    }
}

impl Render for WeekRow {
    fn render(&self) -> String {
        self.iter().map(Render::render).collect::<String>().trim_end().to_string()
    }
}

/// Month rendering with a weekday header row under the title
pub trait MonthRender {
    fn render(&self, weekday_header: &str) -> String;
}

impl MonthRender for MonthDescriptor {
    fn render(&self, weekday_header: &str) -> String {
        let mut lines = vec![month_title(self).bold().to_string(), weekday_header.to_string()];
        lines.extend(self.weeks.iter().map(Render::render));
        lines.join("\n")
    }
}

/// "January 2024"; months past the twelfth fall back to the numeric form.
fn month_title(month: &MonthDescriptor) -> String {
    let start = month.month_start;
    match u8::try_from(start.month()).ok().and_then(|m| Month::try_from(m).ok()) {
        Some(name) => format!("{} {}", name.name(), start.year()),
        None => start.year_month().to_string(),
    }
}

/// Weekday labels in the calendar's column order.
pub fn weekday_header(calendar: &dyn CalendarSystem) -> String {
    let labels: String = weekday_columns(calendar)
        .iter()
        .map(|weekday| format!("{:>3} ", short_label(*weekday)))
        .collect();
    labels.trim_end().dimmed().to_string()
}

fn short_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

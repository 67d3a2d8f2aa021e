use anyhow::Result;
use monthgrid_core::{CalendarDay, CalendarError, CalendarView};
use owo_colors::OwoColorize;

pub fn run(view: CalendarView, date: Option<CalendarDay>, offset: Option<f64>) -> Result<()> {
    match (date, offset) {
        (Some(date), _) => locate_date(&view, date),
        (None, Some(offset)) => locate_offset(&view, offset),
        (None, None) => anyhow::bail!("Give a date to locate or an --offset to resolve"),
    }
}

fn locate_date(view: &CalendarView, date: CalendarDay) -> Result<()> {
    let total = view.shape().len();

    match view.scroll_to_date(date, false) {
        Ok(request) => {
            let position = format!("month {} of {}", request.month_index + 1, total);
            match request.offset {
                Some(offset) => println!("{} {} (offset {})", request.month, position, offset),
                None => println!("{} {}", request.month, position),
            }
            Ok(())
        }
        Err(CalendarError::NotFound(not_found)) => {
            let range = match (view.shape().first_month(), view.shape().last_month()) {
                (Some(first), Some(last)) => format!("{} to {}", first, last),
                _ => "nothing".to_string(),
            };
            anyhow::bail!("{} (showing {})", not_found, range)
        }
        Err(e) => Err(e.into()),
    }
}

fn locate_offset(view: &CalendarView, offset: f64) -> Result<()> {
    match view.visible_month(offset) {
        Some(month) => println!("{}", month),
        None => println!("{}", "No months to show".dimmed()),
    }
    Ok(())
}

use anyhow::Result;
use monthgrid_core::{AppliedSelection, CalendarDay, CalendarError, CalendarView};
use owo_colors::OwoColorize;

use crate::render::{MonthRender, weekday_header};

pub fn run(mut view: CalendarView, select: Vec<CalendarDay>, json: bool) -> Result<()> {
    for day in select {
        match view.select(day) {
            Ok(AppliedSelection::AlreadySelected(day)) => {
                eprintln!("{}", format!("{} is already selected", day).dimmed());
            }
            Ok(_) => {}
            Err(CalendarError::Rejected(rejected)) => {
                eprintln!("{} {}", "Skipped:".yellow(), rejected);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let grid = view.grid();

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    if grid.is_empty() {
        println!("{}", "No months to show".dimmed());
        return Ok(());
    }

    let header = weekday_header(view.calendar().as_ref());
    let months: Vec<String> = grid.months().iter().map(|m| m.render(&header)).collect();
    println!("{}", months.join("\n\n"));

    let selected = view.selection().state().days();
    if !selected.is_empty() {
        let labels: Vec<String> = selected.iter().map(CalendarDay::to_string).collect();
        println!("\n{} {}", "Selected:".bold(), labels.join(", "));
    }

    Ok(())
}

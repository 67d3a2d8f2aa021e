mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, Utc, Weekday};
use clap::{Args, Parser, Subcommand};
use monthgrid_core::grid_config::GridConfig;
use monthgrid_core::{CalendarDay, CalendarView, SelectionMode};
use tracing_subscriber::EnvFilter;

/// Days shown after today when no last date is configured
const DEFAULT_SPAN_DAYS: i64 = 90;

#[derive(Parser)]
#[command(name = "monthgrid")]
#[command(about = "Lay out month calendars and try out date selection from the terminal")]
struct Cli {
    /// Read configuration from this file instead of ~/.config/monthgrid/config.toml
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the months between two dates
    Show {
        #[command(flatten)]
        grid: GridArgs,

        /// Select this date (repeatable; in single mode the last one wins)
        #[arg(short, long = "select")]
        select: Vec<CalendarDay>,

        /// Print the grid model as JSON instead of drawing it
        #[arg(long)]
        json: bool,
    },
    /// Find the month index and scroll offset of a date, or the month at an offset
    Locate {
        /// Date to scroll to (YYYY-MM-DD)
        date: Option<CalendarDay>,

        /// Report the month at the top of the view at this scroll offset
        #[arg(long, conflicts_with = "date")]
        offset: Option<f64>,

        #[command(flatten)]
        grid: GridArgs,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write a commented default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Overrides for values normally read from the config file.
#[derive(Args)]
struct GridArgs {
    /// First month to display (YYYY-MM-DD, only month and year are used)
    #[arg(long)]
    from: Option<CalendarDay>,

    /// Last month to display (YYYY-MM-DD, only month and year are used)
    #[arg(long)]
    to: Option<CalendarDay>,

    /// Days before this one cannot be selected (YYYY-MM-DD)
    #[arg(long)]
    first_selectable: Option<CalendarDay>,

    /// "single" or "multiple"
    #[arg(short, long)]
    mode: Option<SelectionMode>,

    /// Leftmost weekday column, e.g. "mon" or "sunday"
    #[arg(long)]
    first_weekday: Option<Weekday>,

    /// IANA time zone used to decide which day "today" is
    #[arg(long)]
    tz: Option<String>,
}

impl GridArgs {
    fn apply(self, config: &mut GridConfig) {
        if let Some(from) = self.from {
            config.first_date = Some(from);
        }
        if let Some(to) = self.to {
            config.last_date = Some(to);
        }
        if let Some(first) = self.first_selectable {
            config.first_selectable_date = Some(first);
        }
        if let Some(mode) = self.mode {
            config.selection_mode = mode;
        }
        if let Some(weekday) = self.first_weekday {
            config.first_weekday = weekday;
        }
        if let Some(tz) = self.tz {
            config.time_zone = Some(tz);
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { grid, select, json } => {
            let view = build_view(&config_path, grid)?;
            commands::show::run(view, select, json)
        }
        Commands::Locate { date, offset, grid } => {
            let view = build_view(&config_path, grid)?;
            commands::locate::run(view, date, offset)
        }
        Commands::Config { init } => commands::config::run(&config_path, init),
    }
}

fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(shellexpand::tilde(path).into_owned())),
        None => Ok(GridConfig::config_path()?),
    }
}

/// Load the config, apply command-line overrides and fill in a default range
/// starting today.
fn build_view(config_path: &std::path::Path, args: GridArgs) -> Result<CalendarView> {
    let mut config = if config_path.exists() {
        GridConfig::load_from(config_path)?
    } else {
        GridConfig::default()
    };
    args.apply(&mut config);

    let calendar = config.calendar()?;
    let now = Utc::now();
    if config.first_date.is_none() {
        config.first_date = Some(monthgrid_core::normalize::normalize(now, &calendar)?);
    }
    if config.last_date.is_none() {
        let later = now + Duration::days(DEFAULT_SPAN_DAYS);
        config.last_date = Some(monthgrid_core::normalize::normalize(later, &calendar)?);
    }

    tracing::debug!(
        first = ?config.first_date,
        last = ?config.last_date,
        mode = %config.selection_mode,
        "building calendar view"
    );

    Ok(CalendarView::from_config(&config)?)
}

//! Calendar view configuration.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::calendar::Gregorian;
use crate::day::CalendarDay;
use crate::error::{CalendarError, CalendarResult};
use crate::scroll::UniformLayout;
use crate::selection::SelectionMode;

const ENV_PREFIX: &str = "MONTHGRID";

fn default_first_weekday() -> Weekday {
    Weekday::Sun
}

fn is_default_first_weekday(w: &Weekday) -> bool {
    *w == default_first_weekday()
}

fn is_default_mode(m: &SelectionMode) -> bool {
    *m == SelectionMode::default()
}

/// Configuration at ~/.config/monthgrid/config.toml
///
/// Every field is optional. Values can also be set through `MONTHGRID_*`
/// environment variables, with `__` separating nested keys
/// (`MONTHGRID_LAYOUT__ROW_HEIGHT=50`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_date: Option<CalendarDay>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<CalendarDay>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_selectable_date: Option<CalendarDay>,

    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub selection_mode: SelectionMode,

    #[serde(default = "default_first_weekday", skip_serializing_if = "is_default_first_weekday")]
    pub first_weekday: Weekday,

    /// IANA zone used to split instants into days. Defaults to the system zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(default)]
    pub layout: UniformLayout,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            first_date: None,
            last_date: None,
            first_selectable_date: None,
            selection_mode: SelectionMode::default(),
            first_weekday: default_first_weekday(),
            time_zone: None,
            layout: UniformLayout::default(),
        }
    }
}

impl GridConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("monthgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template on
    /// first use.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (missing files are allowed), then apply environment
    /// overrides.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: GridConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Write the config to `path` as TOML.
    pub fn save_to(&self, path: &Path) -> CalendarResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let layout = UniformLayout::default();
        let contents = format!(
            "\
# monthgrid configuration

# Months to display (only the month and year are used):
# first_date = \"2024-01-01\"
# last_date = \"2024-12-31\"

# Days before this one cannot be selected:
# first_selectable_date = \"2024-01-15\"

# \"single\" or \"multiple\":
# selection_mode = \"single\"

# Leftmost weekday column:
# first_weekday = \"Sun\"

# Zone used to decide which day an instant falls on (defaults to the system zone):
# time_zone = \"Europe/Paris\"

# [layout]
# header_height = {}
# row_height = {}
# content_inset_top = {}
",
            layout.header_height, layout.row_height, layout.content_inset_top
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }

    /// The calendar described by `time_zone` and `first_weekday`.
    pub fn calendar(&self) -> CalendarResult<Gregorian> {
        match &self.time_zone {
            Some(name) => Gregorian::with_time_zone_name(self.first_weekday, name),
            None => Ok(Gregorian::current().with_first_weekday(self.first_weekday)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarSystem;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        GridConfig::create_default_config(&path).unwrap();
        let config = GridConfig::load_from(&path).unwrap();

        assert_eq!(config.first_date, None);
        assert_eq!(config.selection_mode, SelectionMode::Single);
        assert_eq!(config.first_weekday, Weekday::Sun);
        assert_eq!(config.layout, UniformLayout::default());
    }

    #[test]
    fn test_load_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
first_date = "2024-01-15"
last_date = "2024-03-10"
first_selectable_date = "2024-02-01"
selection_mode = "multiple"
first_weekday = "Mon"
time_zone = "Europe/Paris"

[layout]
row_height = 50.0
"#,
        )
        .unwrap();

        let config = GridConfig::load_from(&path).unwrap();

        assert_eq!(config.first_date, Some(CalendarDay::new(2024, 1, 15)));
        assert_eq!(config.last_date, Some(CalendarDay::new(2024, 3, 10)));
        assert_eq!(config.first_selectable_date, Some(CalendarDay::new(2024, 2, 1)));
        assert_eq!(config.selection_mode, SelectionMode::Multiple);
        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.layout.row_height, 50.0);
        assert_eq!(config.layout.header_height, UniformLayout::default().header_height);

        let calendar = config.calendar().unwrap();
        assert_eq!(calendar.first_weekday(), Weekday::Mon);
        assert_eq!(calendar.time_zone(), chrono_tz::Europe::Paris);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = GridConfig {
            first_date: Some(CalendarDay::new(2024, 1, 1)),
            last_date: Some(CalendarDay::new(2024, 12, 31)),
            selection_mode: SelectionMode::Multiple,
            ..GridConfig::default()
        };

        config.save_to(&path).unwrap();
        let reloaded = GridConfig::load_from(&path).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_write_failure_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");

        let result = GridConfig::default().save_to(&path);
        assert!(matches!(result, Err(CalendarError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_bad_date_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "first_date = \"next tuesday\"\n").unwrap();

        let result = GridConfig::load_from(&path);
        assert!(matches!(result, Err(CalendarError::Config(_))));
    }

    #[test]
    fn test_unknown_time_zone_is_rejected() {
        let config = GridConfig {
            time_zone: Some("Nowhere/Special".to_string()),
            ..GridConfig::default()
        };

        assert!(matches!(
            config.calendar(),
            Err(CalendarError::UnknownTimeZone(_))
        ));
    }
}

use std::path::Path;

use anyhow::Result;
use monthgrid_core::grid_config::GridConfig;
use owo_colors::OwoColorize;

pub fn run(config_path: &Path, init: bool) -> Result<()> {
    if init {
        if config_path.exists() {
            println!("{}", "Config file already exists, leaving it alone".dimmed());
        } else {
            GridConfig::create_default_config(config_path)?;
            println!("Created {}", config_path.display());
        }
    }

    println!("{} {}", "Config file:".bold(), config_path.display());

    let config = if config_path.exists() {
        GridConfig::load_from(config_path)?
    } else {
        println!("{}", "(not created yet, using defaults)".dimmed());
        GridConfig::default()
    };

    println!();
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

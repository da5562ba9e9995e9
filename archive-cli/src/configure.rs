use anyhow::{Context, Result};
use archive_core::{Config, PageSize};
use inquire::{CustomType, Select, Text};
use std::path::PathBuf;

/// Walk through every setting, defaulting to the current value, then save.
pub fn run(mut config: Config) -> Result<()> {
    config.endpoint = Text::new("Archive endpoint")
        .with_default(&config.endpoint)
        .prompt()
        .context("Failed to read archive endpoint")?;

    let sizes = PageSize::all().to_vec();
    let current = sizes.iter().position(|s| *s == config.page_size).unwrap_or(0);
    config.page_size = Select::new("Rows per page", sizes)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read page size")?;

    let chart_path = config.chart_path.display().to_string();
    config.chart_path = PathBuf::from(
        Text::new("Chart output path")
            .with_default(&chart_path)
            .prompt()
            .context("Failed to read chart path")?,
    );

    config.chart_width = CustomType::<u32>::new("Chart width (px)")
        .with_default(config.chart_width)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Failed to read chart width")?;

    config.chart_height = CustomType::<u32>::new("Chart height (px)")
        .with_default(config.chart_height)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Failed to read chart height")?;

    let path = config.save()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

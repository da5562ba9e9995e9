use anyhow::bail;
use archive_core::{
    Action, Banner, ChartStyle, ChartView, Config, Controller, Field, OpenMeteoArchive, PageSize,
};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::{configure, render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-archive",
    version,
    about = "Hourly temperature history from the Open-Meteo archive"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Archive endpoint, overriding the configured one.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form and browse results interactively (default).
    Interactive,

    /// Fetch one date range and print a single page of the table.
    Query {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start_date: NaiveDate,

        /// Last day, YYYY-MM-DD.
        #[arg(long)]
        end_date: NaiveDate,

        /// Zero-based page to print.
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Rows per page: 20, 50 or 100.
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,

        /// Also write the temperature chart as SVG to this path.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Edit the configuration file interactively.
    Configure,
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let value: usize = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    PageSize::try_from(value)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }

        match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => session::run(&config).await?,
            Command::Configure => configure::run(config)?,
            Command::Query { latitude, longitude, start_date, end_date, page, page_size, chart } => {
                let archive = OpenMeteoArchive::new(config.endpoint.clone());
                let mut controller =
                    Controller::new(archive, page_size.unwrap_or(config.page_size));

                controller.edit(Field::Latitude, latitude.to_string());
                controller.edit(Field::Longitude, longitude.to_string());
                controller.edit(Field::StartDate, start_date.format("%Y-%m-%d").to_string());
                controller.edit(Field::EndDate, end_date.format("%Y-%m-%d").to_string());

                controller.submit().await?;

                if let Some(error) = controller.state().error() {
                    bail!("{}\n{error}", Banner::Error.text());
                }

                controller.dispatch(Action::ChangePage(page));
                let state = controller.state();

                println!("{}", render::navbar());
                if let Some(banner) = state.banner() {
                    println!("{}", render::banner(banner));
                }
                println!("{}", render::table(state));
                if let Some(summary) = render::summary(state) {
                    println!("{summary}");
                }

                if let Some(path) = chart {
                    let mut view = ChartView::new(ChartStyle::default(), config.chart_size());
                    view.sync(state.series(), state.data_version());
                    view.save(&path)?;
                    println!("Chart written to {}", path.display());
                }
            }
        }

        Ok(())
    }
}

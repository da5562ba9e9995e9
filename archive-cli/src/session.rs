//! Interactive form/results loop.

use anyhow::Result;
use archive_core::{
    Action, ChartStyle, ChartView, Config, Controller, Field, Mode, OpenMeteoArchive, PageSize,
    PanDirection,
};
use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultsCommand {
    NextPage,
    PreviousPage,
    PageSize,
    ZoomIn,
    ZoomOut,
    Pan(PanDirection),
    ResetView,
    SaveChart,
    OpenForm,
    Quit,
}

impl fmt::Display for ResultsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResultsCommand::NextPage => "Next page",
            ResultsCommand::PreviousPage => "Previous page",
            ResultsCommand::PageSize => "Rows per page",
            ResultsCommand::ZoomIn => "Zoom in",
            ResultsCommand::ZoomOut => "Zoom out",
            ResultsCommand::Pan(PanDirection::Left) => "Pan left",
            ResultsCommand::Pan(PanDirection::Right) => "Pan right",
            ResultsCommand::Pan(PanDirection::Up) => "Pan up",
            ResultsCommand::Pan(PanDirection::Down) => "Pan down",
            ResultsCommand::ResetView => "Reset chart view",
            ResultsCommand::SaveChart => "Save chart",
            ResultsCommand::OpenForm => "Open Form Again",
            ResultsCommand::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Commands that make sense for the current page position.
fn results_menu(has_next: bool, has_previous: bool) -> Vec<ResultsCommand> {
    let mut menu = Vec::new();
    if has_next {
        menu.push(ResultsCommand::NextPage);
    }
    if has_previous {
        menu.push(ResultsCommand::PreviousPage);
    }
    menu.extend([
        ResultsCommand::PageSize,
        ResultsCommand::ZoomIn,
        ResultsCommand::ZoomOut,
        ResultsCommand::Pan(PanDirection::Left),
        ResultsCommand::Pan(PanDirection::Right),
        ResultsCommand::Pan(PanDirection::Up),
        ResultsCommand::Pan(PanDirection::Down),
        ResultsCommand::ResetView,
        ResultsCommand::SaveChart,
        ResultsCommand::OpenForm,
        ResultsCommand::Quit,
    ]);
    menu
}

/// Ctrl-C / Esc end the session instead of surfacing as an error.
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let archive = OpenMeteoArchive::new(config.endpoint.clone());
    let mut controller = Controller::new(archive, config.page_size);
    let mut chart = ChartView::new(ChartStyle::default(), config.chart_size());

    tracing::debug!(endpoint = %config.endpoint, "starting interactive session");

    loop {
        println!("{}", render::navbar());
        if let Some(banner) = controller.state().banner() {
            println!("{}", render::banner(banner));
        }

        let keep_going = match controller.state().mode() {
            Mode::Form => form_screen(&mut controller).await?,
            Mode::Results => results_screen(&mut controller, &mut chart, config)?,
        };

        if !keep_going {
            break;
        }
    }

    Ok(())
}

async fn form_screen(controller: &mut Controller<OpenMeteoArchive>) -> Result<bool> {
    if let Some(error) = controller.state().error() {
        println!("{error}");
    }
    println!("Weather Data Form");

    for field in Field::all() {
        let current = controller.state().form().get(*field).to_owned();
        let help = match field {
            Field::Latitude | Field::Longitude => "decimal degrees",
            Field::StartDate | Field::EndDate => "YYYY-MM-DD",
        };

        let mut prompt = Text::new(field.label()).with_help_message(help);
        if !current.is_empty() {
            prompt = prompt.with_default(&current);
        }

        let Some(value) = answered(prompt.prompt())? else {
            return Ok(false);
        };
        controller.edit(*field, value);
    }

    println!("Loading…");
    if let Err(err) = controller.submit().await {
        println!("{err}");
    }

    Ok(true)
}

fn results_screen(
    controller: &mut Controller<OpenMeteoArchive>,
    chart: &mut ChartView,
    config: &Config,
) -> Result<bool> {
    let state = controller.state();
    chart.sync(state.series(), state.data_version());

    println!("{}", render::table(state));
    if let Some(summary) = render::summary(state) {
        println!("{summary}");
    }

    let total = state.series().len();
    let pagination = *state.pagination();
    let menu = results_menu(pagination.has_next(total), pagination.has_previous());

    let Some(command) = answered(Select::new("Next action", menu).prompt())? else {
        return Ok(false);
    };

    match command {
        ResultsCommand::NextPage => {
            controller.dispatch(Action::ChangePage(pagination.page() + 1));
        }
        ResultsCommand::PreviousPage => {
            controller.dispatch(Action::ChangePage(pagination.page().saturating_sub(1)));
        }
        ResultsCommand::PageSize => {
            let choice = Select::new("Rows per page", PageSize::all().to_vec()).prompt();
            if let Some(size) = answered(choice)? {
                controller.dispatch(Action::ChangePageSize(size));
            }
        }
        ResultsCommand::ZoomIn => chart.zoom_in(),
        ResultsCommand::ZoomOut => chart.zoom_out(),
        ResultsCommand::Pan(direction) => chart.pan(direction),
        ResultsCommand::ResetView => chart.reset_view(),
        ResultsCommand::SaveChart => match chart.save(&config.chart_path) {
            Ok(()) => println!("Chart written to {}", config.chart_path.display()),
            Err(err) => {
                tracing::error!(%err, "could not save chart");
                println!("{err}");
            }
        },
        ResultsCommand::OpenForm => {
            controller.dispatch(Action::ReopenForm);
            chart.sync(controller.state().series(), controller.state().data_version());
        }
        ResultsCommand::Quit => return Ok(false),
    }

    if matches!(
        command,
        ResultsCommand::ZoomIn
            | ResultsCommand::ZoomOut
            | ResultsCommand::Pan(_)
            | ResultsCommand::ResetView
    ) {
        let vp = chart.viewport();
        println!(
            "Chart view: hours {:.1}–{:.1}, {:.1}°C–{:.1}°C (save to refresh {})",
            vp.x_min,
            vp.x_max,
            vp.y_min,
            vp.y_max,
            config.chart_path.display()
        );
    }

    Ok(true)
}

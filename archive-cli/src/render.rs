use archive_core::{Banner, DisplayRow, ViewState};

const HEADERS: [&str; 3] = ["Date", "Time (AM/PM)", "Temperature (°C)"];

pub fn navbar() -> String {
    let title = " WeatherApp";
    format!("{title:<60}\n{}", "═".repeat(60))
}

pub fn banner(banner: Banner) -> String {
    match banner {
        Banner::Success => format!("[ok] {}", banner.text()),
        Banner::Error => format!("[error] {}", banner.text()),
    }
}

pub fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{t}°C"),
        None => "—".to_string(),
    }
}

fn cells(row: &DisplayRow) -> [String; 3] {
    [row.formatted_date.clone(), row.formatted_time.clone(), temperature(row.temperature_celsius)]
}

/// The current page of the results table with a pagination footer.
pub fn table(state: &ViewState) -> String {
    let rows = state.series().rows();
    let pagination = state.pagination();
    let visible: Vec<[String; 3]> = pagination.slice(&rows).iter().map(cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &visible {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cols: [&str; 3]| {
        cols.iter()
            .zip(widths)
            .map(|(c, w)| format!("{c}{}", " ".repeat(w - c.chars().count())))
            .collect::<Vec<_>>()
            .join("  │  ")
    };

    let total = rows.len();
    let mut lines = vec![
        "Weather Data".to_string(),
        line(HEADERS),
        widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("──┼──"),
    ];
    lines.extend(visible.iter().map(|row| line([row[0].as_str(), row[1].as_str(), row[2].as_str()])));
    lines.push(format!(
        "Rows per page: {}    {}    Page {}/{}",
        pagination.page_size(),
        pagination.caption(total),
        pagination.page().saturating_add(1),
        pagination.page_count(total).max(1),
    ));
    lines.join("\n")
}

/// One-line range summary printed under the table.
pub fn summary(state: &ViewState) -> Option<String> {
    let temps = &state.series().temperatures;
    let (lo, hi) = temps.iter().flatten().fold(None, |acc: Option<(f64, f64)>, t| match acc {
        None => Some((*t, *t)),
        Some((lo, hi)) => Some((lo.min(*t), hi.max(*t))),
    })?;
    Some(format!("Lowest Temperature: {lo}°C    Highest Temperature: {hi}°C"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::{Action, Effect, Field, HourlySeries, PageSize, transform_hourly};

    fn results_state(hours: usize) -> ViewState {
        let mut state = ViewState::new(PageSize::Twenty);
        state.reduce(Action::EditField(Field::Latitude, "40".into()));
        state.reduce(Action::EditField(Field::Longitude, "-74".into()));
        state.reduce(Action::EditField(Field::StartDate, "2024-01-01".into()));
        state.reduce(Action::EditField(Field::EndDate, "2024-01-01".into()));

        let Effect::Fetch { ticket, .. } = state.reduce(Action::Submit) else {
            panic!("form should submit");
        };
        let hourly = HourlySeries {
            time: (0..hours).map(|h| format!("2024-01-01T{h:02}:00")).collect(),
            temperature_2m: (0..hours).map(|h| if h == 2 { None } else { Some(h as f64 + 0.5) }).collect(),
        };
        state.reduce(Action::FetchSucceeded { ticket, series: transform_hourly(&hourly) });
        state
    }

    #[test]
    fn temperature_cells() {
        assert_eq!(temperature(Some(3.5)), "3.5°C");
        assert_eq!(temperature(Some(-2.0)), "-2°C");
        assert_eq!(temperature(None), "—");
    }

    #[test]
    fn table_shows_first_page_and_footer() {
        let state = results_state(24);
        let table = table(&state);

        assert!(table.contains("Time (AM/PM)"));
        assert!(table.contains("12:00 AM"));
        assert!(table.contains("7:00 PM"));
        assert!(!table.contains("8:00 PM"));
        assert!(table.contains("1–20 of 24"));
        assert!(table.contains("Page 1/2"));
    }

    #[test]
    fn table_shows_remainder_on_last_page() {
        let mut state = results_state(24);
        state.reduce(Action::ChangePage(1));
        let table = table(&state);

        assert!(table.contains("8:00 PM"));
        assert!(table.contains("11:00 PM"));
        assert!(table.contains("21–24 of 24"));
    }

    #[test]
    fn table_survives_huge_page_index() {
        let mut state = results_state(24);
        state.reduce(Action::ChangePage(usize::MAX));
        let table = table(&state);

        assert!(!table.contains("12:00 AM"));
        assert!(table.contains("0–0 of 24"));
        assert!(table.ends_with(&format!("Page {}/2", usize::MAX)));
    }

    #[test]
    fn summary_skips_missing_values() {
        let state = results_state(4);
        assert_eq!(
            summary(&state).as_deref(),
            Some("Lowest Temperature: 0.5°C    Highest Temperature: 3.5°C")
        );
        assert_eq!(summary(&ViewState::default()), None);
    }

    #[test]
    fn banner_text() {
        assert!(banner(Banner::Success).contains("Weather data loaded successfully!"));
        assert!(banner(Banner::Error).starts_with("[error]"));
    }
}

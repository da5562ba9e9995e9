//! Temperature line chart with pan and zoom, rendered to SVG with `plotters`.

use plotters::prelude::*;
use std::{fs, path::Path};
use thiserror::Error;

use crate::transform::DisplaySeries;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Draw(String),

    #[error("failed to write chart to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn draw_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Draw(err.to_string())
}

/// Fixed presentation of the temperature chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub title: String,
    pub series_label: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub line_color: (u8, u8, u8),
    pub fill_opacity: f64,
    pub max_x_ticks: usize,
    pub max_y_ticks: usize,
    pub begin_at_zero: bool,
    /// Fraction of the visible span gained or lost per zoom step; also the pan step.
    pub zoom_speed: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Temperature Over Time".to_string(),
            series_label: "Temperature (°C)".to_string(),
            x_axis_title: "Time (Hours)".to_string(),
            y_axis_title: "Temperature (°C)".to_string(),
            line_color: (75, 192, 192),
            fill_opacity: 0.2,
            max_x_ticks: 7,
            max_y_ticks: 5,
            begin_at_zero: false,
            zoom_speed: 0.1,
        }
    }
}

/// Visible window in data coordinates. `x` is the row index, `y` degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    fn fit(temperatures: &[Option<f64>], begin_at_zero: bool) -> Self {
        let n = temperatures.len().max(1) as f64;

        let (lo, hi) = temperatures
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));

        let (mut y_min, y_max) = if lo > hi {
            (0.0, 1.0)
        } else if (hi - lo).abs() < 1e-6 {
            (lo - 1.0, hi + 1.0)
        } else {
            let pad = (hi - lo) * 0.1;
            (lo - pad, hi + pad)
        };

        if begin_at_zero {
            y_min = y_min.min(0.0);
        }

        Self { x_min: -0.5, x_max: n - 0.5, y_min, y_max }
    }

    fn zoom(&mut self, factor: f64) {
        let (cx, hx) = ((self.x_min + self.x_max) / 2.0, (self.x_max - self.x_min) / 2.0 * factor);
        let (cy, hy) = ((self.y_min + self.y_max) / 2.0, (self.y_max - self.y_min) / 2.0 * factor);
        self.x_min = cx - hx;
        self.x_max = cx + hx;
        self.y_min = cy - hy;
        self.y_max = cy + hy;
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        let (w, h) = (self.x_max - self.x_min, self.y_max - self.y_min);
        self.x_min += w * dx;
        self.x_max += w * dx;
        self.y_min += h * dy;
        self.y_max += h * dy;
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

/// One rendered frame. Dropped whenever the data or the viewport changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSurface {
    svg: String,
}

impl ChartSurface {
    pub fn svg(&self) -> &str {
        &self.svg
    }
}

#[derive(Debug, Clone)]
pub struct ChartView {
    style: ChartStyle,
    size: (u32, u32),
    labels: Vec<String>,
    temperatures: Vec<Option<f64>>,
    data_version: Option<u64>,
    home: Viewport,
    viewport: Viewport,
    surface: Option<ChartSurface>,
}

impl ChartView {
    pub fn new(style: ChartStyle, size: (u32, u32)) -> Self {
        let home = Viewport::fit(&[], style.begin_at_zero);
        Self {
            style,
            size,
            labels: Vec::new(),
            temperatures: Vec::new(),
            data_version: None,
            home,
            viewport: home,
            surface: None,
        }
    }

    /// Replace the plotted data. The previous surface is released and the view re-fitted.
    pub fn set_data(&mut self, labels: Vec<String>, temperatures: Vec<Option<f64>>) {
        self.release();
        self.home = Viewport::fit(&temperatures, self.style.begin_at_zero);
        self.viewport = self.home;
        self.labels = labels;
        self.temperatures = temperatures;
    }

    /// Pick up `series` if `version` differs from what is currently plotted.
    pub fn sync(&mut self, series: &DisplaySeries, version: u64) {
        if self.data_version == Some(version) {
            return;
        }
        tracing::debug!(version, points = series.len(), "chart data changed");
        self.set_data(series.dates.clone(), series.temperatures.clone());
        self.data_version = Some(version);
    }

    pub fn release(&mut self) {
        self.surface = None;
    }

    pub fn surface(&self) -> Option<&ChartSurface> {
        self.surface.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn zoom_in(&mut self) {
        self.release();
        self.viewport.zoom(1.0 - self.style.zoom_speed);
    }

    pub fn zoom_out(&mut self) {
        self.release();
        self.viewport.zoom(1.0 / (1.0 - self.style.zoom_speed));
    }

    pub fn pan(&mut self, direction: PanDirection) {
        self.release();
        let step = self.style.zoom_speed;
        match direction {
            PanDirection::Left => self.viewport.shift(-step, 0.0),
            PanDirection::Right => self.viewport.shift(step, 0.0),
            PanDirection::Up => self.viewport.shift(0.0, step),
            PanDirection::Down => self.viewport.shift(0.0, -step),
        }
    }

    pub fn reset_view(&mut self) {
        self.release();
        self.viewport = self.home;
    }

    /// Category label for a point on the x axis; blank between and outside categories.
    pub fn label_at(&self, x: f64) -> String {
        let rounded = x.round();
        if rounded < 0.0 || (x - rounded).abs() > 0.25 {
            return String::new();
        }
        self.labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Render the current viewport, reusing the existing surface if nothing changed.
    pub fn render(&mut self) -> Result<&ChartSurface, ChartError> {
        if self.surface.is_none() {
            let svg = self.draw()?;
            tracing::debug!(bytes = svg.len(), "chart rendered");
            self.surface = Some(ChartSurface { svg });
        }

        self.surface.as_ref().ok_or_else(|| ChartError::Draw("no surface".to_string()))
    }

    pub fn save(&mut self, path: &Path) -> Result<(), ChartError> {
        let svg = self.render()?.svg().to_owned();
        fs::write(path, svg).map_err(|source| ChartError::Write {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "chart written");
        Ok(())
    }

    /// Contiguous runs of visible points; missing temperatures break the line.
    fn visible_segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for (i, temperature) in self.temperatures.iter().enumerate() {
            let x = i as f64;
            match temperature {
                Some(t) if self.viewport.contains_x(x) => current.push((x, *t)),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn draw(&self) -> Result<String, ChartError> {
        let style = &self.style;
        let vp = self.viewport;
        let (r, g, b) = style.line_color;
        let line = RGBColor(r, g, b);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&style.title, ("sans-serif", 20))
                .margin(12)
                .x_label_area_size(48)
                .y_label_area_size(56)
                .build_cartesian_2d(vp.x_min..vp.x_max, vp.y_min..vp.y_max)
                .map_err(draw_err)?;

            let x_labels = |x: &f64| self.label_at(*x);
            chart
                .configure_mesh()
                .x_desc(style.x_axis_title.as_str())
                .y_desc(style.y_axis_title.as_str())
                .axis_desc_style(("sans-serif", 14))
                .x_labels(style.max_x_ticks)
                .y_labels(style.max_y_ticks)
                .x_label_formatter(&x_labels)
                .y_label_formatter(&|y: &f64| format!("{y:.1}"))
                .light_line_style(BLACK.mix(0.1))
                .draw()
                .map_err(draw_err)?;

            for (i, segment) in self.visible_segments().into_iter().enumerate() {
                let series = chart
                    .draw_series(
                        AreaSeries::new(segment, vp.y_min, line.mix(style.fill_opacity).filled())
                            .border_style(line.stroke_width(2)),
                    )
                    .map_err(draw_err)?;

                if i == 0 {
                    series.label(style.series_label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], line.stroke_width(2))
                    });
                }
            }

            if !self.temperatures.iter().all(Option::is_none) {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperMiddle)
                    .label_font(("sans-serif", 14))
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK.mix(0.3))
                    .draw()
                    .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
        }

        Ok(svg)
    }
}

impl Default for ChartView {
    fn default() -> Self {
        Self::new(ChartStyle::default(), (1024, 600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;

    fn series(n: usize) -> DisplaySeries {
        let times: Vec<String> = (0..n).map(|h| format!("2024-01-01T{:02}:00", h % 24)).collect();
        let temps: Vec<Option<f64>> = (0..n).map(|h| Some(h as f64 - 5.0)).collect();
        transform(&times, &temps)
    }

    #[test]
    fn fit_pads_temperature_range() {
        let vp = Viewport::fit(&[Some(0.0), Some(10.0)], false);
        assert_eq!(vp.y_min, -1.0);
        assert_eq!(vp.y_max, 11.0);
        assert_eq!(vp.x_min, -0.5);
        assert_eq!(vp.x_max, 1.5);
    }

    #[test]
    fn fit_handles_flat_and_empty_data() {
        let flat = Viewport::fit(&[Some(4.0), Some(4.0)], false);
        assert_eq!((flat.y_min, flat.y_max), (3.0, 5.0));

        let empty = Viewport::fit(&[None], false);
        assert_eq!((empty.y_min, empty.y_max), (0.0, 1.0));
    }

    #[test]
    fn y_axis_does_not_begin_at_zero_by_default() {
        let vp = Viewport::fit(&[Some(20.0), Some(30.0)], ChartStyle::default().begin_at_zero);
        assert!(vp.y_min > 0.0);
    }

    #[test]
    fn render_produces_svg_with_titles() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);

        let svg = view.render().unwrap().svg().to_owned();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Temperature Over Time"));
        assert!(svg.contains("Time (Hours)"));
        assert!(svg.contains("Mon, Jan 1, 2024"));
    }

    #[test]
    fn render_is_cached_until_something_changes() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);

        let first = view.render().unwrap().svg().as_ptr();
        let again = view.render().unwrap().svg().as_ptr();
        assert_eq!(first, again);
        assert!(view.surface().is_some());

        let before = view.render().unwrap().svg().to_owned();
        view.zoom_in();
        assert!(view.surface().is_none());
        let after = view.render().unwrap().svg().to_owned();
        assert_ne!(before, after);
    }

    #[test]
    fn new_data_releases_previous_surface() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);
        view.render().unwrap();

        view.sync(&series(24), 1);
        assert!(view.surface().is_some());

        view.sync(&series(48), 2);
        assert!(view.surface().is_none());
        assert_eq!(view.len(), 48);
    }

    #[test]
    fn new_data_resets_zoom() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);
        let home = view.viewport();

        view.zoom_in();
        view.pan(PanDirection::Left);
        assert_ne!(view.viewport(), home);

        view.sync(&series(24), 2);
        assert_eq!(view.viewport(), home);
    }

    #[test]
    fn zoom_in_then_out_restores_span() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);
        let home = view.viewport();

        view.zoom_in();
        let zoomed = view.viewport();
        assert!(zoomed.x_max - zoomed.x_min < home.x_max - home.x_min);
        assert!(zoomed.y_max - zoomed.y_min < home.y_max - home.y_min);

        view.zoom_out();
        let back = view.viewport();
        assert!((back.x_max - back.x_min - (home.x_max - home.x_min)).abs() < 1e-9);
    }

    #[test]
    fn pan_moves_both_axes() {
        let mut view = ChartView::default();
        view.sync(&series(24), 1);
        let home = view.viewport();

        view.pan(PanDirection::Right);
        assert!(view.viewport().x_min > home.x_min);

        view.pan(PanDirection::Down);
        assert!(view.viewport().y_min < home.y_min);

        view.reset_view();
        assert_eq!(view.viewport(), home);
    }

    #[test]
    fn labels_only_at_categories() {
        let mut view = ChartView::default();
        view.sync(&series(3), 1);

        assert_eq!(view.label_at(0.0), "Mon, Jan 1, 2024");
        assert_eq!(view.label_at(1.5), "");
        assert_eq!(view.label_at(-1.0), "");
        assert_eq!(view.label_at(7.0), "");
    }

    #[test]
    fn gaps_split_segments() {
        let mut view = ChartView::default();
        view.set_data(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![Some(1.0), None, Some(2.0), Some(3.0)],
        );

        let segments = view.visible_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], vec![(2.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn save_writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        let mut view = ChartView::default();
        view.sync(&series(24), 1);
        view.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Temperature Over Time"));
    }
}

//! Reshapes the archive's parallel arrays into display-ready columns.
//!
//! Everything here is pure: the same input always yields the same output.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{DisplayRow, HourlySample, HourlySeries, pair_samples};

/// Text used for timestamps that cannot be parsed, in both the date and time column.
pub const INVALID_DATE: &str = "Invalid Date";

const DATE_FORMAT: &str = "%a, %b %-d, %Y";
const TIME_FORMAT: &str = "%-I:%M %p";

/// Three index-aligned columns derived from one archive response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplaySeries {
    pub dates: Vec<String>,
    pub times: Vec<String>,
    pub temperatures: Vec<Option<f64>>,
}

impl DisplaySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<DisplayRow> {
        Some(DisplayRow {
            formatted_date: self.dates.get(index)?.clone(),
            formatted_time: self.times.get(index)?.clone(),
            temperature_celsius: self.temperatures.get(index).copied().flatten(),
        })
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        (0..self.len()).filter_map(|i| self.row(i)).collect()
    }
}

/// Transform parallel timestamp/temperature sequences.
///
/// The output always has one entry per timestamp. A temperature missing at an
/// index (shorter array or `null`) is carried as `None`; surplus temperatures
/// are dropped.
pub fn transform(times: &[String], temperatures: &[Option<f64>]) -> DisplaySeries {
    shape(pair_samples(times, temperatures))
}

pub fn transform_hourly(hourly: &HourlySeries) -> DisplaySeries {
    shape(hourly.samples())
}

fn shape<'a>(samples: impl Iterator<Item = HourlySample<'a>>) -> DisplaySeries {
    let mut series = DisplaySeries::default();
    for sample in samples {
        let parsed = parse_timestamp(sample.timestamp);
        series.dates.push(format_or_invalid(parsed, DATE_FORMAT));
        series.times.push(format_or_invalid(parsed, TIME_FORMAT));
        series.temperatures.push(sample.temperature_celsius);
    }
    series
}

pub fn format_date(timestamp: &str) -> String {
    format_or_invalid(parse_timestamp(timestamp), DATE_FORMAT)
}

pub fn format_time(timestamp: &str) -> String {
    format_or_invalid(parse_timestamp(timestamp), TIME_FORMAT)
}

/// The archive sends local wall-clock times without an offset, e.g. `2024-01-01T13:00`.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn format_or_invalid(parsed: Option<NaiveDateTime>, format: &str) -> String {
    match parsed {
        Some(dt) => dt.format(format).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn formats_dates_with_short_names() {
        assert_eq!(format_date("2024-01-01T00:00"), "Mon, Jan 1, 2024");
        assert_eq!(format_date("2023-12-25T18:00"), "Mon, Dec 25, 2023");
        assert_eq!(format_date("2024-07-04T09:00:00"), "Thu, Jul 4, 2024");
    }

    #[test]
    fn formats_times_on_twelve_hour_clock() {
        assert_eq!(format_time("2024-01-01T00:00"), "12:00 AM");
        assert_eq!(format_time("2024-01-01T01:00"), "1:00 AM");
        assert_eq!(format_time("2024-01-01T12:00"), "12:00 PM");
        assert_eq!(format_time("2024-01-01T23:30"), "11:30 PM");
    }

    #[test]
    fn unparseable_timestamp_stays_aligned() {
        let series = transform(
            &strings(&["garbage", "2024-01-01T05:00"]),
            &[Some(1.0), Some(2.0)],
        );

        assert_eq!(series.dates, vec![INVALID_DATE, "Mon, Jan 1, 2024"]);
        assert_eq!(series.times, vec![INVALID_DATE, "5:00 AM"]);
        assert_eq!(series.temperatures, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn output_length_follows_timestamps() {
        let times = strings(&["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"]);

        let short = transform(&times, &[Some(1.0)]);
        assert_eq!(short.len(), 3);
        assert_eq!(short.temperatures, vec![Some(1.0), None, None]);

        let long = transform(&times[..1], &[Some(1.0), Some(2.0)]);
        assert_eq!(long.len(), 1);
        assert_eq!(long.temperatures, vec![Some(1.0)]);
    }

    #[test]
    fn transform_is_pure() {
        let times = strings(&["2024-03-10T02:00", "2024-03-10T03:00"]);
        let temps = [Some(-1.5), Some(0.25)];

        let first = transform(&times, &temps);
        let _unrelated = transform(&strings(&["2020-01-01T00:00"]), &[None]);
        let second = transform(&times, &temps);

        assert_eq!(first, second);
    }

    #[test]
    fn temperatures_pass_through_unchanged() {
        let series = transform(&strings(&["2024-01-01T00:00"]), &[Some(-3.14159)]);
        assert_eq!(series.temperatures, vec![Some(-3.14159)]);
    }

    #[test]
    fn hourly_series_and_raw_arrays_agree() {
        let hourly = HourlySeries {
            time: strings(&["2024-01-01T00:00", "2024-01-01T01:00"]),
            temperature_2m: vec![Some(2.5), None],
        };

        let series = transform_hourly(&hourly);
        assert_eq!(series, transform(&hourly.time, &hourly.temperature_2m));
        assert_eq!(series.temperatures, vec![Some(2.5), None]);
    }

    #[test]
    fn rows_zip_columns() {
        let series = transform(&strings(&["2024-01-01T13:00"]), &[Some(7.2)]);
        let rows = series.rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].formatted_date, "Mon, Jan 1, 2024");
        assert_eq!(rows[0].formatted_time, "1:00 PM");
        assert_eq!(rows[0].temperature_celsius, Some(7.2));
        assert!(series.row(1).is_none());
    }
}

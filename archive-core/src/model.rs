use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything needed to ask the archive for one hourly temperature series.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl QueryParameters {
    /// Query string pairs in the order the archive endpoint documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
            ("hourly", "temperature_2m".to_string()),
        ]
    }
}

/// Body returned by the archive endpoint. Only the fields we read are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub hourly: HourlySeries,
}

/// Parallel hourly arrays; index `i` of `time` belongs to index `i` of `temperature_2m`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    /// The archive reports hours without a measurement as `null`.
    pub temperature_2m: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = HourlySample<'_>> {
        pair_samples(&self.time, &self.temperature_2m)
    }
}

/// Pair parallel arrays by index, one sample per timestamp. A temperature
/// missing at an index (shorter array or `null`) becomes `None`; surplus
/// temperatures are ignored.
pub fn pair_samples<'a>(
    times: &'a [String],
    temperatures: &'a [Option<f64>],
) -> impl Iterator<Item = HourlySample<'a>> {
    times.iter().enumerate().map(move |(i, timestamp)| HourlySample {
        timestamp: timestamp.as_str(),
        temperature_celsius: temperatures.get(i).copied().flatten(),
    })
}

/// One hour of the archive series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySample<'a> {
    pub timestamp: &'a str,
    pub temperature_celsius: Option<f64>,
}

/// A formatted (date, time, temperature) triple ready for the table or chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub formatted_date: String,
    pub formatted_time: String,
    pub temperature_celsius: Option<f64>,
}

/// Error body the archive sends alongside a 4xx status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArchiveErrorBody {
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_use_iso_dates_and_fixed_hourly_variable() {
        let params = QueryParameters {
            latitude: 40.0,
            longitude: -74.5,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };

        let pairs = params.to_query_pairs();
        assert_eq!(pairs[0], ("latitude", "40".to_string()));
        assert_eq!(pairs[1], ("longitude", "-74.5".to_string()));
        assert_eq!(pairs[2], ("start_date", "2024-01-01".to_string()));
        assert_eq!(pairs[3], ("end_date", "2024-01-31".to_string()));
        assert_eq!(pairs[4], ("hourly", "temperature_2m".to_string()));
    }

    #[test]
    fn deserializes_null_temperatures() {
        let body = r#"{
            "latitude": 40.0,
            "longitude": -74.0,
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "temperature_2m": [3.5, null]
            }
        }"#;

        let parsed: ArchiveResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.hourly.len(), 2);
        assert_eq!(parsed.hourly.temperature_2m, vec![Some(3.5), None]);
    }

    #[test]
    fn samples_pair_up_by_index() {
        let hourly = HourlySeries {
            time: vec!["a".into(), "b".into(), "c".into()],
            temperature_2m: vec![Some(1.0), Some(2.0)],
        };

        let samples: Vec<_> = hourly.samples().collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].timestamp, "b");
        assert_eq!(samples[1].temperature_celsius, Some(2.0));
        assert_eq!(samples[2].temperature_celsius, None);
    }
}

//! Core library for the `weather-archive` CLI.
//!
//! This crate defines:
//! - The archive client and its error type
//! - Reshaping hourly responses into display columns
//! - Form/results view state, pagination and the temperature chart
//! - Configuration handling
//!
//! It is used by `archive-cli`, but nothing here depends on a terminal.

pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod table;
pub mod transform;
pub mod view;

pub use chart::{ChartError, ChartStyle, ChartView, PanDirection};
pub use client::{ArchiveSource, DEFAULT_ENDPOINT, OpenMeteoArchive};
pub use config::Config;
pub use error::{FetchError, FormError};
pub use model::{ArchiveResponse, DisplayRow, HourlySample, HourlySeries, QueryParameters};
pub use table::{PageSize, Pagination, page_slice};
pub use transform::{DisplaySeries, transform, transform_hourly};
pub use view::{Action, Banner, Controller, Effect, Field, FormFields, Mode, ViewState, fetch_display};

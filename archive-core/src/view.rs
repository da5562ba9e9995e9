//! Form/results view state and the reducer that drives it.
//!
//! The state only changes through [`ViewState::reduce`]. Fetching is left to the
//! caller: a submit returns [`Effect::Fetch`] and the outcome comes back as
//! [`Action::FetchSucceeded`] or [`Action::FetchFailed`].

use chrono::NaiveDate;

use crate::{
    client::ArchiveSource,
    error::{FetchError, FormError},
    model::QueryParameters,
    table::{PageSize, Pagination},
    transform::{DisplaySeries, transform_hourly},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Form,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Latitude,
    Longitude,
    StartDate,
    EndDate,
}

impl Field {
    pub const fn all() -> &'static [Field] {
        &[Field::Latitude, Field::Longitude, Field::StartDate, Field::EndDate]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::StartDate => "Start Date",
            Field::EndDate => "End Date",
        }
    }
}

/// Raw text of the four form inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Latitude => &self.latitude,
            Field::Longitude => &self.longitude,
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
        };
        *slot = value;
    }

    /// Parse the inputs. Only presence and syntax are checked: no coordinate
    /// ranges, no date ordering.
    pub fn to_query(&self) -> Result<QueryParameters, FormError> {
        let missing: Vec<&'static str> = Field::all()
            .iter()
            .filter(|f| self.get(**f).trim().is_empty())
            .map(Field::label)
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(QueryParameters {
            latitude: parse_number(Field::Latitude, &self.latitude)?,
            longitude: parse_number(Field::Longitude, &self.longitude)?,
            start_date: parse_date(Field::StartDate, &self.start_date)?,
            end_date: parse_date(Field::EndDate, &self.end_date)?,
        })
    }
}

fn parse_number(field: Field, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormError::InvalidNumber { field: field.label(), value: raw.to_string() })
}

fn parse_date(field: Field, raw: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate { field: field.label(), value: raw.to_string() })
}

/// Outcome banner shown above the form or the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Success,
    Error,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        match self {
            Banner::Success => "Weather data loaded successfully!",
            Banner::Error => {
                "Error fetching weather data. Please check the latitude, longitude, or date range."
            }
        }
    }
}

/// Identifies one submission so that a superseded response can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug)]
pub enum Action {
    EditField(Field, String),
    Submit,
    FetchSucceeded { ticket: RequestTicket, series: DisplaySeries },
    FetchFailed { ticket: RequestTicket, error: FetchError },
    ChangePage(usize),
    ChangePageSize(PageSize),
    ReopenForm,
}

/// What the caller must do after a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fetch { ticket: RequestTicket, params: QueryParameters },
    Rejected(FormError),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    mode: Mode,
    form: FormFields,
    loading: bool,
    error: Option<String>,
    banner: Option<Banner>,
    series: DisplaySeries,
    pagination: Pagination,
    /// Bumped whenever `series` is replaced, so views can tell stale renders apart.
    data_version: u64,
    issued: u64,
    pending: Option<RequestTicket>,
}

impl ViewState {
    pub fn new(page_size: PageSize) -> Self {
        Self { pagination: Pagination::new(page_size), ..Self::default() }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn series(&self) -> &DisplaySeries {
        &self.series
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn page_size(&self) -> PageSize {
        self.pagination.page_size()
    }

    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    pub fn reduce(&mut self, action: Action) -> Effect {
        match action {
            Action::EditField(field, value) => {
                if self.mode == Mode::Form {
                    self.form.set(field, value);
                }
                Effect::None
            }
            Action::Submit => self.submit(),
            Action::FetchSucceeded { ticket, series } => {
                if !self.accept(ticket) {
                    return Effect::None;
                }
                self.series = series;
                self.data_version += 1;
                self.pagination.reset();
                self.error = None;
                self.banner = Some(Banner::Success);
                self.mode = Mode::Results;
                tracing::info!(rows = self.series.len(), "showing results");
                Effect::None
            }
            Action::FetchFailed { ticket, error } => {
                if !self.accept(ticket) {
                    return Effect::None;
                }
                tracing::error!(%error, "error fetching weather data");
                self.error = Some(error.message());
                self.banner = Some(Banner::Error);
                Effect::None
            }
            Action::ChangePage(page) => {
                self.pagination.set_page(page);
                Effect::None
            }
            Action::ChangePageSize(size) => {
                self.pagination.set_page_size(size);
                Effect::None
            }
            Action::ReopenForm => {
                self.reopen();
                Effect::None
            }
        }
    }

    fn submit(&mut self) -> Effect {
        if self.mode != Mode::Form {
            return Effect::None;
        }

        let params = match self.form.to_query() {
            Ok(params) => params,
            Err(err) => {
                tracing::debug!(%err, "form submission rejected");
                return Effect::Rejected(err);
            }
        };

        if let Some(previous) = self.pending {
            tracing::debug!(?previous, "superseding in-flight request");
        }

        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        self.pending = Some(ticket);
        self.loading = true;
        self.error = None;

        Effect::Fetch { ticket, params }
    }

    /// Only the most recently issued request may change the state.
    fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.pending != Some(ticket) {
            tracing::warn!(?ticket, latest = ?self.pending, "discarding stale archive response");
            return false;
        }
        self.pending = None;
        self.loading = false;
        true
    }

    fn reopen(&mut self) {
        self.mode = Mode::Form;
        self.form = FormFields::default();
        self.series = DisplaySeries::default();
        self.data_version += 1;
        self.pagination.reset();
        self.error = None;
        self.banner = None;
        self.loading = false;
        self.pending = None;
    }
}

/// Fetch one query and reshape it for display.
pub async fn fetch_display<S: ArchiveSource + ?Sized>(
    source: &S,
    params: &QueryParameters,
) -> Result<DisplaySeries, FetchError> {
    let response = source.fetch_hourly(params).await?;
    Ok(transform_hourly(&response.hourly))
}

/// Owns a [`ViewState`] and the source that feeds it.
#[derive(Debug)]
pub struct Controller<S> {
    source: S,
    state: ViewState,
}

impl<S: ArchiveSource> Controller<S> {
    pub fn new(source: S, page_size: PageSize) -> Self {
        Self { source, state: ViewState::new(page_size) }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        self.state.reduce(action)
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.dispatch(Action::EditField(field, value.into()));
    }

    /// Submit the form and wait for the archive. A rejected form returns the
    /// reason without issuing a request; fetch failures land in the state.
    pub async fn submit(&mut self) -> Result<(), FormError> {
        match self.state.reduce(Action::Submit) {
            Effect::Fetch { ticket, params } => {
                let action = match fetch_display(&self.source, &params).await {
                    Ok(series) => Action::FetchSucceeded { ticket, series },
                    Err(error) => Action::FetchFailed { ticket, error },
                };
                self.state.reduce(action);
                Ok(())
            }
            Effect::Rejected(err) => Err(err),
            Effect::None => Ok(()),
        }
    }
}

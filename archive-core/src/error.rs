use thiserror::Error;

/// Message shown when the failure carries no status text of its own.
pub const GENERIC_FETCH_MESSAGE: &str = "Failed to fetch weather data";

/// Why a request to the archive endpoint did not produce a usable series.
///
/// Every variant collapses to the same user-visible message via [`FetchError::message`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("archive request failed with status {code}")]
    Status {
        code: u16,
        status_text: Option<String>,
        reason: Option<String>,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode archive response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Remote status text, if the server answered at all.
    pub fn status_text(&self) -> Option<&str> {
        match self {
            FetchError::Status { status_text, .. } => status_text.as_deref(),
            FetchError::Network(err) => err.status().and_then(|s| s.canonical_reason()),
            FetchError::Decode(_) => None,
        }
    }

    /// The text surfaced to the user: the status text when available, else a generic message.
    pub fn message(&self) -> String {
        self.status_text()
            .map(str::to_owned)
            .unwrap_or_else(|| GENERIC_FETCH_MESSAGE.to_string())
    }
}

/// Rejection of a form submission before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields(Vec<&'static str>),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a date in YYYY-MM-DD form, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

use thiserror::Error;

/// Errors raised while turning a portal payload into a [`SeriesReport`](crate::series::SeriesReport).
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    /// The configured dataset is not part of the chart payload
    #[error("dataset '{target}' not found in payload, available: {available:?}")]
    DatasetNotFound {
        target: String,
        available: Vec<String>,
    },

    /// A date label could not be parsed, usually an upstream format change
    #[error("cannot parse date label '{label}': {reason}")]
    LabelParse { label: String, reason: String },

    /// The portal answered with something that is not JSON (login page, error page...)
    #[error("response is not JSON (first 500 chars): {snippet}")]
    NonJsonResponse { snippet: String },

    /// JSON without the expected chart structure
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid query window: {0}")]
    InvalidWindow(String),
}

/// Errors raised while reading the runtime configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

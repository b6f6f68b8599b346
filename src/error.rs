use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a city's backing file into a [`crate::trip::Dataset`].
///
/// Any of these aborts the whole query; no partial dataset is returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read trip data at {path}: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trip data: {0}")]
    Csv(#[from] csv::Error),

    #[error("trip data is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: `{column}` is blank")]
    MissingValue { line: u64, column: &'static str },

    #[error("line {line}: cannot parse start time '{value}'")]
    MalformedTimestamp { line: u64, value: String },

    #[error("line {line}: invalid trip duration '{value}'")]
    InvalidDuration { line: u64, value: String },
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{pass} statistics did not finish within the time limit")]
    Timeout { pass: &'static str },

    #[error("{pass} statistics task failed: {source}")]
    Task {
        pass: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Rejected user selection, with the values that would have been accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{input}' is not one of: {}", .allowed.join(", "))]
pub struct ParseChoiceError {
    pub input: String,
    pub allowed: Vec<&'static str>,
}

impl ParseChoiceError {
    pub fn new(input: &str, allowed: &[&'static str]) -> Self {
        Self {
            input: input.trim().to_string(),
            allowed: allowed.to_vec(),
        }
    }
}

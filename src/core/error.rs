//! Typed failures of the extract and rate-loading stages

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to fetch document from {location}")]
    Fetch {
        location: String,
        #[source]
        source: BoxError,
    },

    #[error("No tabular structure found in document")]
    Structure,

    #[error("Row {row}: value '{text}' is not a non-negative number")]
    InvalidValue { row: usize, text: String },
}

impl ExtractError {
    pub fn fetch(location: &str, source: impl Into<BoxError>) -> Self {
        ExtractError::Fetch {
            location: location.to_string(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Failed to read rate table: {0}")]
    Read(#[from] csv::Error),

    #[error("Rate table line {line}: expected at least 2 columns, found {found}")]
    MissingColumn { line: u64, found: usize },

    #[error("Rate table line {line}: currency code is empty")]
    EmptyCode { line: u64 },

    #[error("Rate table line {line}: invalid multiplier '{text}' for {code}")]
    InvalidMultiplier { line: u64, code: String, text: String },
}

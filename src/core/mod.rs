//! Core ETL logic: extraction, conversion and the canned queries

pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod log;
pub mod progress;
pub mod query;
pub mod rates;
pub mod source;
pub mod table;

// Re-export main types for cleaner imports
pub use error::{ExtractError, RateError};
pub use rates::RateEntry;
pub use source::DocumentSource;
pub use table::{Fields, Record, Table};

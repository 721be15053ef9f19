//! Exchange rate table loading

use crate::core::error::RateError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A currency code and its multiplier relative to the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub code: String,
    pub multiplier: f64,
}

impl RateEntry {
    pub fn new(code: impl Into<String>, multiplier: f64) -> Self {
        RateEntry {
            code: code.into(),
            multiplier,
        }
    }
}

/// Loads the whole rate file. The first row is a header and is skipped.
pub fn load_rates<P: AsRef<Path>>(path: P) -> Result<Vec<RateEntry>, RateError> {
    debug!("Loading rate table from {}", path.as_ref().display());
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    read_rates(reader)
}

/// Parses rate rows from any CSV reader.
pub fn read_rates<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<RateEntry>, RateError> {
    let mut rates = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() < 2 {
            return Err(RateError::MissingColumn {
                line,
                found: record.len(),
            });
        }

        let code = record[0].to_string();
        if code.is_empty() {
            return Err(RateError::EmptyCode { line });
        }

        let multiplier = record[1]
            .parse::<f64>()
            .ok()
            .filter(|m| m.is_finite() && *m > 0.0)
            .ok_or_else(|| RateError::InvalidMultiplier {
                line,
                code: code.clone(),
                text: record[1].to_string(),
            })?;

        rates.push(RateEntry { code, multiplier });
    }

    debug!("Loaded {} exchange rates", rates.len());
    Ok(rates)
}

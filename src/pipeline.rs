//! Explicit orchestration of the fetch, convert, load and query stages

use crate::core::convert::transform;
use crate::core::extract::{ExtractOptions, extract};
use crate::core::progress::ProgressLog;
use crate::core::query::{CannedQueries, QueryResult};
use crate::core::rates::load_rates;
use crate::core::{DocumentSource, Table};
use crate::store::{SqliteSink, TableSink};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::info;

/// Everything the pipeline needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub extract: ExtractOptions,
    pub rates_path: PathBuf,
    /// Currency whose converted column is averaged by the second query.
    pub query_currency: String,
}

pub struct PipelineOutput {
    pub table: Table,
    pub dropped: usize,
    pub queries: Vec<QueryResult>,
}

/// Runs the job once, stopping at the first failure.
///
/// Order: rates, extract, transform, CSV, SQLite (with progress entries
/// before and after), then the canned queries on the same connection.
/// The database is only opened once the CSV has been written.
pub async fn run(
    source: &dyn DocumentSource,
    settings: &PipelineSettings,
    csv: &mut dyn TableSink,
    db: &mut SqliteSink,
    log: &ProgressLog,
) -> Result<PipelineOutput> {
    let rates = load_rates(&settings.rates_path).with_context(|| {
        format!(
            "Failed to load exchange rates from {}",
            settings.rates_path.display()
        )
    })?;
    if !rates.iter().any(|r| r.code == settings.query_currency) {
        bail!(
            "Query currency {} is not in the exchange rate table",
            settings.query_currency
        );
    }

    let extracted = extract(source, &settings.extract)
        .await
        .with_context(|| format!("Failed to extract data from {}", source.location()))?;

    let table = transform(extracted.table, &rates);
    info!(
        rows = table.len(),
        currencies = rates.len(),
        "Transformed table"
    );

    csv.write(&table)
        .with_context(|| format!("Failed to load data to {}", csv.destination()))?;

    log.record("SQL Connection initiated.")?;
    db.write(&table)
        .with_context(|| format!("Failed to load data into table {}", db.destination()))?;
    log.record(&format!(
        "Data successfully loaded into the table {} in the SQLite database.",
        db.table_name()
    ))?;

    let queries = CannedQueries::new(
        db.table_name(),
        &table.fields().name,
        &table.fields().converted(&settings.query_currency),
    )
    .run(db.connection().context("Database connection is not open")?)?;

    Ok(PipelineOutput {
        table,
        dropped: extracted.dropped,
        queries,
    })
}

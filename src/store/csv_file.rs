use crate::core::Table;
use crate::store::TableSink;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Writes the table as a delimited file with a header row and no index column.
/// The destination is overwritten on every write.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvSink { path: path.into() }
    }
}

impl TableSink for CsvSink {
    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&mut self, table: &Table) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create CSV file: {}", self.path.display()))?;

        writer
            .write_record(table.column_names())
            .context("Failed to write CSV header")?;

        for record in table.records() {
            let mut row = vec![record.name.clone()];
            row.extend(record.numeric_cells().map(format_number));
            writer
                .write_record(&row)
                .with_context(|| format!("Failed to write CSV row for {}", record.name))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush CSV file: {}", self.path.display()))?;
        debug!(rows = table.len(), path = %self.path.display(), "Wrote CSV");
        Ok(())
    }
}

/// Float rendering that keeps a trailing `.0` on whole numbers.
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

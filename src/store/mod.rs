pub mod csv_file;
pub mod sqlite;

use crate::core::Table;
use anyhow::Result;

pub use csv_file::CsvSink;
pub use sqlite::SqliteSink;

/// A persistence target that accepts a whole table at once.
pub trait TableSink {
    /// Where the table ends up, for logs and progress messages.
    fn destination(&self) -> String;

    fn write(&mut self, table: &Table) -> Result<()>;
}

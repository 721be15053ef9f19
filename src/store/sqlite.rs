use crate::core::Table;
use crate::core::query::quote_ident;
use crate::store::TableSink;
use anyhow::{Context, Result};
use rusqlite::{Connection, params_from_iter, types::Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads the table into SQLite, replacing any table of the same name.
///
/// A sink built with [`SqliteSink::new`] does not touch the database file
/// until the first write, so a job that fails earlier leaves no file behind.
pub struct SqliteSink {
    db_path: Option<PathBuf>,
    conn: Option<Connection>,
    table_name: String,
}

impl SqliteSink {
    pub fn new<P: AsRef<Path>>(db_path: P, table_name: &str) -> Self {
        SqliteSink {
            db_path: Some(db_path.as_ref().to_path_buf()),
            conn: None,
            table_name: table_name.to_string(),
        }
    }

    pub fn with_connection(conn: Connection, table_name: &str) -> Self {
        SqliteSink {
            db_path: None,
            conn: Some(conn),
            table_name: table_name.to_string(),
        }
    }

    /// Opens the database file on first use and returns the live connection.
    pub fn connect(&mut self) -> Result<&mut Connection> {
        if self.conn.is_none() {
            let db_path = self
                .db_path
                .as_deref()
                .context("No database path configured")?;
            let conn = Connection::open(db_path)
                .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
            debug!(path = %db_path.display(), "Opened SQLite database");
            self.conn = Some(conn);
        }
        self.conn.as_mut().context("Database connection is not open")
    }

    /// The live connection, if the sink has connected yet.
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Closes the underlying connection, reporting any close failure.
    pub fn close(self) -> Result<()> {
        match self.conn {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| e)
                .context("Failed to close database"),
            None => Ok(()),
        }
    }
}

impl TableSink for SqliteSink {
    fn destination(&self) -> String {
        self.table_name.clone()
    }

    fn write(&mut self, table: &Table) -> Result<()> {
        let name = quote_ident(&self.table_name);
        let columns = table.column_names();

        let definitions: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let kind = if i == 0 { "TEXT" } else { "REAL" };
                format!("{} {kind}", quote_ident(column))
            })
            .collect();
        let placeholders = vec!["?"; columns.len()].join(", ");

        let table_name = self.table_name.clone();
        let tx = self
            .connect()?
            .transaction()
            .context("Failed to start transaction")?;
        tx.execute(&format!("DROP TABLE IF EXISTS {name}"), [])
            .with_context(|| format!("Failed to drop table {table_name}"))?;
        tx.execute(
            &format!("CREATE TABLE {name} ({})", definitions.join(", ")),
            [],
        )
        .with_context(|| format!("Failed to create table {table_name}"))?;

        {
            let mut insert = tx
                .prepare(&format!("INSERT INTO {name} VALUES ({placeholders})"))
                .context("Failed to prepare insert")?;
            for record in table.records() {
                let row = std::iter::once(Value::Text(record.name.clone()))
                    .chain(record.numeric_cells().map(Value::Real));
                insert
                    .execute(params_from_iter(row))
                    .with_context(|| format!("Failed to insert row for {}", record.name))?;
            }
        }

        tx.commit().context("Failed to commit table load")?;
        debug!(rows = table.len(), table = %table_name, "Loaded table into SQLite");
        Ok(())
    }
}

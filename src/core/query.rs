//! Canned SELECT statements run after the load

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rusqlite::types::Value;
use tracing::debug;

/// Quotes an SQLite identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Tabular result of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub statement: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Runs a SELECT and collects every row.
pub fn run_query(conn: &Connection, statement: &str) -> Result<QueryResult> {
    debug!(statement, "Running query");
    let mut stmt = conn
        .prepare(statement)
        .with_context(|| format!("Failed to prepare query: {statement}"))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .with_context(|| format!("Failed to run query: {statement}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read rows of query: {statement}"))?;

    debug!(rows = rows.len(), "Query finished");
    Ok(QueryResult {
        statement: statement.to_string(),
        columns,
        rows,
    })
}

/// The three post-load queries: every row, the average of one converted
/// column, and the first five names.
#[derive(Debug, Clone)]
pub struct CannedQueries {
    table: String,
    name_column: String,
    average_column: String,
}

impl CannedQueries {
    pub fn new(table: &str, name_column: &str, average_column: &str) -> Self {
        CannedQueries {
            table: table.to_string(),
            name_column: name_column.to_string(),
            average_column: average_column.to_string(),
        }
    }

    pub fn statements(&self) -> [String; 3] {
        let table = quote_ident(&self.table);
        [
            format!("SELECT * FROM {table}"),
            format!(
                "SELECT AVG({}) FROM {table}",
                quote_ident(&self.average_column)
            ),
            format!(
                "SELECT {} FROM {table} LIMIT 5",
                quote_ident(&self.name_column)
            ),
        ]
    }

    /// Runs all three statements after checking the referenced columns exist.
    pub fn run(&self, conn: &Connection) -> Result<Vec<QueryResult>> {
        let existing = table_columns(conn, &self.table)?;
        if existing.is_empty() {
            bail!("Table {} does not exist", self.table);
        }
        for column in [&self.name_column, &self.average_column] {
            if !existing.contains(column) {
                bail!("Table {} has no column {}", self.table, column);
            }
        }

        self.statements()
            .iter()
            .map(|statement| run_query(conn, statement))
            .collect()
    }
}

/// Column names of `table`, empty when the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read columns of table {table}"))?;
    Ok(columns)
}

/// Display form of an SQLite value.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"CREATE TABLE "Largest_banks" ("Bank name" TEXT, "Market cap (USD)" REAL, "Market cap (GBP)" REAL);
               INSERT INTO "Largest_banks" VALUES
                 ('A', 10.0, 8.0), ('B', 20.0, 16.0), ('C', 30.0, 24.0),
                 ('D', 40.0, 32.0), ('E', 50.0, 40.0), ('F', 60.0, 48.0);"#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_statements_quote_identifiers() {
        let queries = CannedQueries::new("Largest_banks", "Bank name", "Market cap (GBP)");
        assert_eq!(
            queries.statements(),
            [
                r#"SELECT * FROM "Largest_banks""#.to_string(),
                r#"SELECT AVG("Market cap (GBP)") FROM "Largest_banks""#.to_string(),
                r#"SELECT "Bank name" FROM "Largest_banks" LIMIT 5"#.to_string(),
            ]
        );
        assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
    }

    #[test]
    fn test_canned_queries_against_loaded_table() {
        let conn = seeded();
        let queries = CannedQueries::new("Largest_banks", "Bank name", "Market cap (GBP)");
        let results = queries.run(&conn).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].columns,
            vec!["Bank name", "Market cap (USD)", "Market cap (GBP)"]
        );
        assert_eq!(results[0].rows.len(), 6);

        assert_eq!(results[1].rows, vec![vec![Value::Real(28.0)]]);

        let names: Vec<String> = results[2].rows.iter().map(|r| format_value(&r[0])).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let conn = seeded();
        let queries = CannedQueries::new("Largest_banks", "Bank name", "Market cap (JPY)");
        let err = queries.run(&conn).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Table Largest_banks has no column Market cap (JPY)"
        );

        let missing = CannedQueries::new("Nope", "Bank name", "Market cap (GBP)");
        assert!(missing.run(&conn).is_err());
    }

    #[test]
    fn test_invalid_statement_is_an_error() {
        let conn = seeded();
        let err = run_query(&conn, "SELEC nothing").unwrap_err();
        assert!(err.to_string().starts_with("Failed to prepare query"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "NULL");
        assert_eq!(format_value(&Value::Integer(5)), "5");
        assert_eq!(format_value(&Value::Real(1.5)), "1.5");
        assert_eq!(format_value(&Value::Text("x".into())), "x");
    }
}

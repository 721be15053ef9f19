use super::ui;
use crate::core::config::AppConfig;
use crate::core::query::CannedQueries;
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags};

/// Runs the canned queries against a database produced by an earlier run.
pub fn run(config: &AppConfig) -> Result<()> {
    let db_path = &config.outputs.db_path;
    if !db_path.exists() {
        bail!(
            "Database {} not found, run the ETL job first",
            db_path.display()
        );
    }

    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    let queries = CannedQueries::new(
        &config.outputs.table_name,
        &config.fields.name,
        &config.query_column(),
    );

    println!(
        "{}",
        ui::style_text(
            &format!("Queries on {}", db_path.display()),
            ui::StyleType::Title
        )
    );
    for result in queries.run(&conn)? {
        ui::print_separator();
        println!("{}", ui::render_query(&result));
    }
    Ok(())
}

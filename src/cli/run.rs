use super::ui;
use crate::core::config::AppConfig;
use crate::core::progress::ProgressLog;
use crate::pipeline::{self, PipelineOutput, PipelineSettings};
use crate::sources;
use crate::store::{CsvSink, SqliteSink};
use anyhow::Result;
use tracing::info;

/// Runs the full ETL job described by `config` and prints the query results.
pub async fn run(config: &AppConfig) -> Result<()> {
    let source = sources::from_location(&config.source)?;
    let settings = PipelineSettings {
        extract: config.extract_options(),
        rates_path: config.rates_path.clone(),
        query_currency: config.query_currency.clone(),
    };
    let mut csv = CsvSink::new(&config.outputs.csv_path);
    let mut db = SqliteSink::new(&config.outputs.db_path, &config.outputs.table_name);
    let log = ProgressLog::new(&config.log_path);

    let pb = ui::new_spinner(&format!("Fetching {}", source.location()));
    let result = pipeline::run(source.as_ref(), &settings, &mut csv, &mut db, &log).await;
    pb.finish_and_clear();
    let output = result?;

    db.close()?;
    info!("ETL job finished");

    println!("{}", summary(&output, config));
    for query in &output.queries {
        ui::print_separator();
        println!("{}", ui::render_query(query));
    }
    Ok(())
}

fn summary(output: &PipelineOutput, config: &AppConfig) -> String {
    let mut text = format!(
        "Loaded {} into {} and table {} of {}",
        ui::style_text(
            &format!("{} rows", output.table.len()),
            ui::StyleType::Success
        ),
        config.outputs.csv_path.display(),
        config.outputs.table_name,
        config.outputs.db_path.display(),
    );
    if output.dropped > 0 {
        text.push_str(&ui::style_text(
            &format!(" ({} rows skipped)", output.dropped),
            ui::StyleType::Subtle,
        ));
    }
    text
}

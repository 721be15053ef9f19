use crate::core::query::{QueryResult, format_value};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::types::Value;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Statement,
    Success,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Statement => style(text).cyan(),
        StyleType::Success => style(text).green().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Numbers are right aligned, NULL is dimmed.
pub fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::new("NULL").fg(Color::DarkGrey),
        Value::Integer(_) | Value::Real(_) => {
            Cell::new(format_value(value)).set_alignment(CellAlignment::Right)
        }
        _ => Cell::new(format_value(value)),
    }
}

/// Renders the statement followed by its rows.
pub fn render_query(result: &QueryResult) -> String {
    let mut table = new_styled_table();
    table.set_header(result.columns.iter().map(|c| header_cell(c)));
    for row in &result.rows {
        table.add_row(row.iter().map(value_cell));
    }

    format!(
        "{}\n{}",
        style_text(&result.statement, StyleType::Statement),
        table
    )
}

/// Creates a spinner shown while waiting on a single slow step.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

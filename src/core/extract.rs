//! Scrapes the first HTML table into a [`Table`] of named values

use crate::core::error::ExtractError;
use crate::core::source::DocumentSource;
use crate::core::table::{Fields, Record, Table};
use scraper::{ElementRef, Html, Selector};
use std::fmt::Display;
use tracing::{debug, info, instrument};

pub const DEFAULT_PLACEHOLDER: &str = "—";

const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€', '¥', '₹'];

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub fields: Fields,
    /// Cell text meaning "value unavailable".
    pub placeholder: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            fields: Fields::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// A scraped row that passed the acceptance predicate but is not parsed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub label: String,
    pub value_text: String,
}

/// Why a row was left out of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooFewCells(usize),
    MissingLabel,
    Placeholder,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooFewCells(n) => write!(f, "only {n} data cells"),
            Rejection::MissingLabel => write!(f, "no link label in second cell"),
            Rejection::Placeholder => write!(f, "value marked unavailable"),
        }
    }
}

/// Extraction result: the table and how many rows were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub table: Table,
    pub dropped: usize,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("Invalid static CSS selector")
}

/// Fetches the document from `source` and extracts its first table.
#[instrument(name = "Extract", skip_all, fields(location = %source.location()))]
pub async fn extract(
    source: &dyn DocumentSource,
    options: &ExtractOptions,
) -> Result<Extracted, ExtractError> {
    let markup = source.fetch().await?;
    debug!(bytes = markup.len(), "Fetched document");
    extract_from_markup(&markup, options)
}

/// Extracts records from already fetched markup.
pub fn extract_from_markup(
    markup: &str,
    options: &ExtractOptions,
) -> Result<Extracted, ExtractError> {
    let document = Html::parse_document(markup);
    let body = document
        .select(&selector("tbody"))
        .next()
        .ok_or(ExtractError::Structure)?;

    let row_selector = selector("tr");
    let cell_selector = selector("td");

    let mut records = Vec::new();
    let mut dropped = 0;
    for (index, row) in body.select(&row_selector).enumerate() {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell_selector.matches(cell))
            .collect();

        match accept_row(&cells, &options.placeholder) {
            Ok(raw) => {
                let value = parse_value(&raw.value_text).ok_or_else(|| {
                    ExtractError::InvalidValue {
                        row: index,
                        text: raw.value_text.clone(),
                    }
                })?;
                records.push(Record::new(raw.label, value));
            }
            Err(reason) => {
                debug!(row = index, %reason, "Skipping row");
                dropped += 1;
            }
        }
    }

    info!(
        accepted = records.len(),
        dropped, "Extracted records from first table"
    );
    Ok(Extracted {
        table: Table::new(options.fields.clone(), records),
        dropped,
    })
}

/// Row acceptance predicate.
///
/// A row is kept when it has at least three data cells, the second cell holds
/// a link with non-empty text, and the third cell is not the placeholder.
pub fn accept_row(cells: &[ElementRef], placeholder: &str) -> Result<RawRecord, Rejection> {
    if cells.len() < 3 {
        return Err(Rejection::TooFewCells(cells.len()));
    }

    let label = cells[1]
        .select(&selector("a"))
        .map(collapse_text)
        .find(|text| !text.is_empty())
        .ok_or(Rejection::MissingLabel)?;

    let value_text = collapse_text(cells[2]);
    if value_text == placeholder.trim() {
        return Err(Rejection::Placeholder);
    }

    Ok(RawRecord { label, value_text })
}

fn collapse_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses a value cell, stripping thousands separators and currency symbols.
///
/// Returns `None` unless the result is a finite, non-negative number.
pub fn parse_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
<table class="wikitable">
<tbody>
<tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
{rows}
</tbody>
</table>
</body></html>"#
        )
    }

    fn row(rank: u32, name: &str, value: &str) -> String {
        format!(
            r#"<tr><td>{rank}</td><td><span class="flagicon"><img src="flag.png"></span> <a href="/wiki/{name}">{name}</a></td><td>{value}
</td></tr>"#
        )
    }

    #[test]
    fn test_row_with_link_and_dollar_value_becomes_record() {
        let html = page(&row(1, "Bank A", "$100,000.00"));
        let extracted = extract_from_markup(&html, &ExtractOptions::default()).unwrap();

        assert_eq!(extracted.table.len(), 1);
        let record = &extracted.table.records()[0];
        assert_eq!(record.name, "Bank A");
        assert_eq!(record.value, 100000.00);
        // Header row has no data cells.
        assert_eq!(extracted.dropped, 1);
    }

    #[test]
    fn test_placeholder_value_row_is_dropped() {
        let rows = [row(1, "Bank A", "432.92"), row(2, "Bank B", "—")].concat();
        let extracted = extract_from_markup(&page(&rows), &ExtractOptions::default()).unwrap();

        let names: Vec<&str> = extracted
            .table
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bank A"]);
    }

    #[test]
    fn test_rows_without_link_or_with_few_cells_are_dropped() {
        let rows = [
            r#"<tr><td>1</td><td>Plain Bank</td><td>10.0</td></tr>"#.to_string(),
            r#"<tr><td>2</td><td><a href="/x">Short Bank</a></td></tr>"#.to_string(),
            r#"<tr><td>3</td><td><a href="/y"></a></td><td>12.0</td></tr>"#.to_string(),
            row(4, "Kept Bank", "1,234.5"),
        ]
        .concat();
        let extracted = extract_from_markup(&page(&rows), &ExtractOptions::default()).unwrap();

        assert_eq!(extracted.table.len(), 1);
        assert_eq!(extracted.table.records()[0].name, "Kept Bank");
        assert_eq!(extracted.table.records()[0].value, 1234.5);
        assert_eq!(extracted.dropped, 4);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let rows = [
            row(1, "JPMorgan Chase", "432.92"),
            row(2, "Bank of America", "231.52"),
            row(3, "Industrial and Commercial Bank of China", "194.56"),
        ]
        .concat();
        let extracted = extract_from_markup(&page(&rows), &ExtractOptions::default()).unwrap();

        let names: Vec<&str> = extracted
            .table
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "JPMorgan Chase",
                "Bank of America",
                "Industrial and Commercial Bank of China"
            ]
        );
    }

    #[test]
    fn test_only_first_table_is_read() {
        let html = format!(
            "{}<table><tbody>{}</tbody></table>",
            page(&row(1, "First", "1.0")),
            row(1, "Second", "2.0")
        );
        let extracted = extract_from_markup(&html, &ExtractOptions::default()).unwrap();

        assert_eq!(extracted.table.len(), 1);
        assert_eq!(extracted.table.records()[0].name, "First");
    }

    #[test]
    fn test_bare_table_without_tbody_is_found() {
        let html = format!("<table>{}</table>", row(1, "Bank A", "5"));
        let extracted = extract_from_markup(&html, &ExtractOptions::default()).unwrap();
        assert_eq!(extracted.table.len(), 1);
    }

    #[test]
    fn test_document_without_table_is_structure_error() {
        let result = extract_from_markup(
            "<html><body><p>Nothing here</p></body></html>",
            &ExtractOptions::default(),
        );
        assert!(matches!(result, Err(ExtractError::Structure)));
    }

    #[test]
    fn test_malformed_value_fails_fast() {
        let rows = [row(1, "Bank A", "1.0"), row(2, "Bank B", "n/a")].concat();
        let result = extract_from_markup(&page(&rows), &ExtractOptions::default());

        match result {
            Err(ExtractError::InvalidValue { row, text }) => {
                assert_eq!(row, 2);
                assert_eq!(text, "n/a");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_fields_and_placeholder() {
        let options = ExtractOptions {
            fields: Fields {
                name: "Name".to_string(),
                value: "Cap".to_string(),
            },
            placeholder: "N/A".to_string(),
        };
        let rows = [row(1, "Bank A", "N/A"), row(2, "Bank B", "7")].concat();
        let extracted = extract_from_markup(&page(&rows), &options).unwrap();

        assert_eq!(extracted.table.column_names(), vec!["Name", "Cap"]);
        assert_eq!(extracted.table.records()[0].name, "Bank B");
    }

    #[test]
    fn test_extract_is_deterministic() {
        let rows = [row(1, "Bank A", "1.5"), row(2, "Bank B", "2.5")].concat();
        let html = page(&rows);
        let first = extract_from_markup(&html, &ExtractOptions::default()).unwrap();
        let second = extract_from_markup(&html, &ExtractOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" $1,234.50\n"), Some(1234.5));
        assert_eq!(parse_value("£99"), Some(99.0));
        assert_eq!(parse_value("-5"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value(""), None);
    }
}

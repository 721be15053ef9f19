//! In-memory result table shared by the extract, convert and load stages

use serde::{Deserialize, Serialize};

/// A validated row: entity name plus its value in the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub value: f64,
    /// One entry per converted currency, aligned with `Table::currencies`.
    pub converted: Vec<f64>,
}

impl Record {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Record {
            name: name.into(),
            value,
            converted: Vec::new(),
        }
    }

    pub fn converted_value(&self, index: usize) -> Option<f64> {
        self.converted.get(index).copied()
    }

    /// Base value followed by the converted values, in column order.
    pub fn numeric_cells(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.value).chain(self.converted.iter().copied())
    }
}

/// Output column names for the entity name and the base value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Fields {
    pub name: String,
    pub value: String,
}

impl Default for Fields {
    fn default() -> Self {
        Fields {
            name: "Bank name".to_string(),
            value: "Market cap (USD)".to_string(),
        }
    }
}

impl Fields {
    /// Column name for a converted currency, derived from the value column.
    ///
    /// `Market cap (USD)` becomes `Market cap (GBP)`; a value column without a
    /// parenthesized suffix gets one appended.
    pub fn converted(&self, code: &str) -> String {
        let value = self.value.trim_end();
        let stem = match (value.ends_with(')'), value.rfind('(')) {
            (true, Some(open)) => value[..open].trim_end(),
            _ => value,
        };
        format!("{stem} ({code})")
    }
}

/// Ordered rows plus one extra numeric column per converted currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    fields: Fields,
    currencies: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(fields: Fields, records: Vec<Record>) -> Self {
        Table {
            fields,
            currencies: Vec::new(),
            records,
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All column names in output order: name, base value, then conversions.
    pub fn column_names(&self) -> Vec<String> {
        let mut columns = vec![self.fields.name.clone(), self.fields.value.clone()];
        columns.extend(self.currencies.iter().map(|c| self.fields.converted(c)));
        columns
    }

    /// Sets the column for `code` on every record from its base value.
    ///
    /// An existing column with the same name is overwritten in place, so
    /// applying the same conversion twice keeps a single column. A code that
    /// names the base value column rewrites the base value itself.
    pub fn set_converted(&mut self, code: &str, f: impl Fn(f64) -> f64) {
        if self.fields.converted(code) == self.fields.value {
            for record in &mut self.records {
                record.value = f(record.value);
            }
            return;
        }

        let index = match self.currencies.iter().position(|c| c == code) {
            Some(index) => index,
            None => {
                self.currencies.push(code.to_string());
                self.currencies.len() - 1
            }
        };

        for record in &mut self.records {
            let converted = f(record.value);
            match record.converted.get_mut(index) {
                Some(slot) => *slot = converted,
                None => record.converted.push(converted),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_field_replaces_currency_suffix() {
        let fields = Fields::default();
        assert_eq!(fields.converted("GBP"), "Market cap (GBP)");

        let plain = Fields {
            name: "Name".to_string(),
            value: "Value".to_string(),
        };
        assert_eq!(plain.converted("EUR"), "Value (EUR)");
    }

    #[test]
    fn test_column_names_follow_conversion_order() {
        let mut table = Table::new(Fields::default(), vec![Record::new("Bank A", 10.0)]);
        table.set_converted("GBP", |v| v * 0.8);
        table.set_converted("EUR", |v| v * 0.93);

        assert_eq!(
            table.column_names(),
            vec![
                "Bank name",
                "Market cap (USD)",
                "Market cap (GBP)",
                "Market cap (EUR)"
            ]
        );
        let cells: Vec<f64> = table.records()[0].numeric_cells().collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], 10.0);
    }

    #[test]
    fn test_set_converted_overwrites_existing_code() {
        let mut table = Table::new(Fields::default(), vec![Record::new("Bank A", 10.0)]);
        table.set_converted("GBP", |v| v * 2.0);
        table.set_converted("GBP", |v| v * 3.0);

        assert_eq!(table.currencies(), &["GBP".to_string()]);
        assert_eq!(table.records()[0].converted, vec![30.0]);
    }

    #[test]
    fn test_base_currency_code_rewrites_value_column() {
        let mut table = Table::new(Fields::default(), vec![Record::new("Bank A", 10.0)]);
        table.set_converted("USD", |v| v * 2.0);
        table.set_converted("GBP", |v| v * 0.5);

        assert!(table.currencies().iter().all(|c| c != "USD"));
        assert_eq!(
            table.column_names(),
            vec!["Bank name", "Market cap (USD)", "Market cap (GBP)"]
        );
        assert_eq!(table.records()[0].value, 20.0);
        assert_eq!(table.records()[0].converted, vec![10.0]);
    }
}

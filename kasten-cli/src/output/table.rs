//! Table output formatting using the `tabled` crate

use super::OutputConfig;
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format a simple key-value table
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();
        Self::apply_style(&mut table, config);
        table.with(Modify::new(Columns::first()).with(Alignment::right()));

        table.to_string()
    }

    /// Create a simple table from rows of strings
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|s| s.as_str()));
        }

        let mut table = builder.build();
        Self::apply_style(&mut table, config);

        table.to_string()
    }

    fn apply_style(table: &mut tabled::Table, config: &OutputConfig) {
        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }
    }
}

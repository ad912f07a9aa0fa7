use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Tabular writer backed by `comfy-table` for clean, dynamically-aligned CLI output.
///
/// Columns are sized to the widest entry, without borders or separators, so the
/// output stays readable in a terminal and easy to grep.
pub struct TabWriter {
    table: Table,
    indent: String,
    rows: usize,
}

impl TabWriter {
    /// Create a new `TabWriter` with the given column definitions.
    ///
    /// Each column is a `(header, alignment)` pair.
    pub fn new(columns: Vec<(&str, Align)>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let headers: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        table.set_header(headers);

        // Apply alignment and padding to each column.
        // First column: no left padding. Last column: no right padding.
        // Inner columns: (1, 1) padding for a 2-space gap between columns.
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            let cell_align = match align {
                Align::Left => CellAlignment::Left,
                Align::Right => CellAlignment::Right,
            };
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(cell_align);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self {
            table,
            indent: String::new(),
            rows: 0,
        }
    }

    /// Set the indent prefix for every line (e.g. `"  "` for 2-space indent).
    #[must_use]
    pub fn indent(mut self, prefix: &str) -> Self {
        self.indent = prefix.to_string();
        self
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
        self.rows += 1;
    }

    /// Returns `true` if no rows were added.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Render the table with trailing whitespace trimmed, blank lines dropped and the
    /// indent applied.
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for line in self.table.to_string().lines() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            rendered.push_str(&self.indent);
            rendered.push_str(trimmed);
            rendered.push('\n');
        }
        rendered
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Print a section heading followed by `empty` when the table has no rows.
pub fn print_section(title: &str, table: &TabWriter, empty: &str) {
    println!("\n{title}:");
    if table.is_empty() {
        println!("  {empty}");
    } else {
        table.print();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_writer_aligns_columns() {
        let mut tw = TabWriter::new(vec![("Node", Align::Left), ("Depth", Align::Right)]).indent("  ");
        tw.row(vec!["entry".to_string(), "0".to_string()]);
        tw.row(vec!["b".to_string(), "12".to_string()]);

        let rendered = tw.render();
        assert!(!tw.is_empty());
        assert!(rendered.lines().all(|line| line.starts_with("  ")));
        assert!(rendered.lines().all(|line| line == line.trim_end()));
        assert!(rendered.lines().any(|line| line.starts_with("  entry")));
        assert!(rendered.lines().any(|line| line.ends_with("12")));
    }

    #[test]
    fn test_tab_writer_empty() {
        let tw = TabWriter::new(vec![("Source", Align::Left), ("Target", Align::Left)]);
        assert!(tw.is_empty());
    }
}

//! The decoded command table and its console rendering
//!
//! Delimited output is left to the sinks, which feed [`DecodedTable::header`]
//! and [`DecodedTable::cells`] to a CSV writer.

use crate::join::DecodedRow;

/// Argument columns always present in the header
pub const DEFAULT_ARG_COLUMNS: usize = 4;

/// Decoded rows plus the header they are rendered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    rows: Vec<DecodedRow>,
    arg_columns: usize,
}

impl Default for DecodedTable {
    fn default() -> Self {
        Self::from_rows(Vec::new())
    }
}

impl DecodedTable {
    /// Build a table with at least [`DEFAULT_ARG_COLUMNS`] argument columns
    pub fn from_rows(rows: Vec<DecodedRow>) -> Self {
        Self::with_min_arg_columns(rows, DEFAULT_ARG_COLUMNS)
    }

    /// Build a table with at least `min` argument columns
    ///
    /// The header grows past `min` when a row carries more arguments.
    pub fn with_min_arg_columns(rows: Vec<DecodedRow>, min: usize) -> Self {
        let widest = rows.iter().map(|r| r.frame.args.len()).max().unwrap_or(0);
        Self {
            rows,
            arg_columns: widest.max(min),
        }
    }

    pub fn rows(&self) -> &[DecodedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn arg_columns(&self) -> usize {
        self.arg_columns
    }

    /// `action, cmd, argc, arg0, arg1, ...`
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["action".to_string(), "cmd".to_string(), "argc".to_string()];
        header.extend((0..self.arg_columns).map(|i| format!("arg{}", i)));
        header
    }

    /// Cells of every row, padded with empty cells to the header width
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.description.clone(),
                    row.frame.cmd.clone(),
                    row.frame.argc.to_string(),
                ];
                cells.extend(row.frame.args.iter().cloned());
                cells.resize(3 + self.arg_columns, String::new());
                cells
            })
            .collect()
    }

    /// Aligned columns with a leading row index, for reading in a terminal
    pub fn to_text(&self) -> String {
        let header = self.header();
        let cells = self.cells();
        let index_width = cells.len().saturating_sub(1).to_string().len();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(&" ".repeat(index_width));
        for (name, width) in header.iter().zip(&widths) {
            output.push_str(&format!("  {:<width$}", name, width = *width));
        }
        push_line_end(&mut output);

        for (i, row) in cells.iter().enumerate() {
            output.push_str(&format!("{:>width$}", i, width = index_width));
            for (cell, width) in row.iter().zip(&widths) {
                output.push_str(&format!("  {:<width$}", cell, width = *width));
            }
            push_line_end(&mut output);
        }

        output
    }
}

/// End a padded line without its trailing spaces
fn push_line_end(output: &mut String) {
    let trimmed = output.trim_end_matches(' ').len();
    output.truncate(trimmed);
    output.push('\n');
}

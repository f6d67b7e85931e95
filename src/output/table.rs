// file: src/output/table.rs
// version: 1.0.0
// guid: 62cb6eff-f45d-4cb2-9a9c-f4d311db45be

//! Table formatter for human-readable structured output

use super::{Formatter, OutputFormat};
use crate::error::Result;
use serde_json::Value;
use std::io;

/// Width-aligned columns. Arrays of objects become a table with uppercase
/// headers; a single object becomes key/value rows; scalars print as-is.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn kind(&self) -> OutputFormat {
        OutputFormat::Table
    }

    fn format(&self, value: &Value, writer: &mut dyn io::Write) -> Result<()> {
        match value {
            Value::Array(rows) => write_table(rows, writer),
            Value::Object(map) => {
                let rows: Vec<(String, String)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), cell_text(v)))
                    .collect();
                write_pairs(&rows, writer)
            }
            other => {
                writeln!(writer, "{}", cell_text(other))?;
                Ok(())
            }
        }
    }
}

fn write_table(rows: &[Value], writer: &mut dyn io::Write) -> Result<()> {
    // Column set and order come from the first row.
    let columns: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => {
            for row in rows {
                writeln!(writer, "{}", cell_text(row))?;
            }
            return Ok(());
        }
    };

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let text = row.get(column).map(cell_text).unwrap_or_default();
            widths[i] = widths[i].max(text.len());
            line.push(text);
        }
        cells.push(line);
    }

    for (i, column) in columns.iter().enumerate() {
        write_padded(writer, &column.to_uppercase(), widths[i], i + 1 == columns.len())?;
    }
    writeln!(writer)?;
    for line in cells {
        for (i, text) in line.iter().enumerate() {
            write_padded(writer, text, widths[i], i + 1 == columns.len())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_pairs(rows: &[(String, String)], writer: &mut dyn io::Write) -> Result<()> {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        writeln!(writer, "{:<width$}  {}", key, value, width = width)?;
    }
    Ok(())
}

fn write_padded(writer: &mut dyn io::Write, text: &str, width: usize, last: bool) -> Result<()> {
    if last {
        write!(writer, "{}", text)?;
    } else {
        write!(writer, "{:<width$}  ", text, width = width)?;
    }
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

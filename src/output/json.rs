// file: src/output/json.rs
// version: 1.0.0
// guid: fa9ea7e5-1caa-4e10-84c1-1b47f3d7f629

//! JSON formatter

use super::{Formatter, OutputFormat};
use crate::error::Result;
use std::io;

/// Pretty-printed JSON on stdout, one document per command.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn kind(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format(&self, value: &serde_json::Value, writer: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_output_is_pretty_and_newline_terminated() {
        // Arrange
        let value = json!({"version": "0.4.2", "commit": "abc123"});
        let mut out = Vec::new();

        // Act
        JsonFormatter.format(&value, &mut out).unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"version\": \"0.4.2\""));
        assert!(text.ends_with('\n'));
        serde_json::from_str::<serde_json::Value>(&text).unwrap();
    }
}

// file: src/output/mod.rs
// version: 1.2.1
// guid: 7210c00b-0099-4e0e-bd32-9ef51f29a877

//! Structured output: format selection, formatters and the color-aware writer

pub mod json;
pub mod none;
pub mod table;
pub mod writer;

pub use json::JsonFormatter;
pub use none::NoneFormatter;
pub use table::TableFormatter;
pub use writer::{select_writer, AnsiStripper, ColorMode, OutputWriter};

use crate::error::{Result, SkyError};
use clap::{Arg, ArgMatches};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

/// Name of the per-command output format flag.
pub const OUTPUT_ARG: &str = "output";

/// The structured output formats a command can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    None,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Table => "table",
            Self::None => "none",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = SkyError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            "none" => Ok(Self::None),
            _ => Err(SkyError::invalid_argument(format!(
                "unsupported output format '{}' (supported formats: json, table, none)",
                raw
            ))),
        }
    }
}

/// Renders a command's structured result to the output writer.
pub trait Formatter: Send + Sync {
    fn kind(&self) -> OutputFormat;

    fn format(&self, value: &serde_json::Value, writer: &mut dyn io::Write) -> Result<()>;
}

/// Construct the formatter for a selected format.
pub fn create_formatter(format: OutputFormat) -> Arc<dyn Formatter> {
    match format {
        OutputFormat::Json => Arc::new(JsonFormatter),
        OutputFormat::Table => Arc::new(TableFormatter),
        OutputFormat::None => Arc::new(NoneFormatter),
    }
}

/// The `-o/--output` flag for commands that support structured output.
///
/// The flag carries no default: commands fall back to human-readable output
/// when the user selects nothing. The value is validated after parsing, not
/// by clap, so a bad selector surfaces as a regular user-input error during
/// context assembly.
pub fn output_arg() -> Arg {
    Arg::new(OUTPUT_ARG)
        .short('o')
        .long("output")
        .value_name("FORMAT")
        .help("Output format (json, table or none)")
}

/// Resolve the formatter for a parsed command.
///
/// Commands that never declared the output flag get `None`; an unrecognized
/// selector is the user's mistake and comes back as an error.
pub fn get_command_formatter(matches: &ArgMatches) -> Result<Option<Arc<dyn Formatter>>> {
    match matches.try_get_one::<String>(OUTPUT_ARG) {
        Err(_) => Ok(None),
        Ok(None) => Ok(None),
        Ok(Some(raw)) => {
            let format = raw.parse::<OutputFormat>()?;
            Ok(Some(create_formatter(format)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn test_format_round_trips_names() {
        // Act & Assert
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("none".parse::<OutputFormat>().unwrap(), OutputFormat::None);
    }

    #[test]
    fn test_unknown_format_is_invalid_argument() {
        // Act
        let result = "yaml".parse::<OutputFormat>();

        // Assert
        assert!(matches!(result, Err(SkyError::InvalidArgument(_))));
    }

    #[test]
    fn test_formatter_resolution_with_declared_flag() {
        // Arrange
        let matches = Command::new("show")
            .arg(output_arg())
            .get_matches_from(["show", "--output", "json"]);

        // Act
        let formatter = get_command_formatter(&matches).unwrap();

        // Assert
        assert_eq!(formatter.unwrap().kind(), OutputFormat::Json);
    }

    #[test]
    fn test_formatter_absent_when_flag_declared_but_unused() {
        // Arrange
        let matches = Command::new("show")
            .arg(output_arg())
            .get_matches_from(["show"]);

        // Act
        let formatter = get_command_formatter(&matches).unwrap();

        // Assert
        assert!(formatter.is_none());
    }

    #[test]
    fn test_formatter_absent_when_flag_not_declared() {
        // Arrange
        let matches = Command::new("plain").get_matches_from(["plain"]);

        // Act
        let formatter = get_command_formatter(&matches).unwrap();

        // Assert
        assert!(formatter.is_none());
    }

    #[test]
    fn test_bad_selector_is_a_user_error() {
        // Arrange
        let matches = Command::new("show")
            .arg(output_arg())
            .get_matches_from(["show", "-o", "xml"]);

        // Act
        let result = get_command_formatter(&matches);

        // Assert
        match result {
            Err(err) => {
                assert!(matches!(err, SkyError::InvalidArgument(_)));
                assert!(!err.is_fatal());
            }
            Ok(_) => panic!("expected an invalid-argument error"),
        }
    }
}

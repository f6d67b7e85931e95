// file: src/output/none.rs
// version: 1.0.0
// guid: 49bb6aea-6b0d-431b-b526-0bc2c53450c3

//! Formatter that suppresses structured output

use super::{Formatter, OutputFormat};
use crate::error::Result;
use std::io;

/// Swallows the structured result; only explicit console messages remain.
pub struct NoneFormatter;

impl Formatter for NoneFormatter {
    fn kind(&self) -> OutputFormat {
        OutputFormat::None
    }

    fn format(&self, _value: &serde_json::Value, _writer: &mut dyn io::Write) -> Result<()> {
        Ok(())
    }
}
